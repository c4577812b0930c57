use std::collections::HashMap;

use session_cell::context::SessionContext;
use shared_models::PortalError;
use tracing::debug;

use crate::guard::{self, GuardDecision};
use crate::routes::{PathParams, RouteTable, RouteTarget, ScreenId};

/// Redirect hops allowed while resolving a single navigation. The portal
/// table needs at most three (unknown path, guard redirect, alias); anything
/// deeper means the table redirects in a circle.
const MAX_REDIRECTS: usize = 8;

pub type QueryParams = HashMap<String, String>;

/// Where a navigation ended up: the screen to show, the final path, and the
/// path and query parameters captured along the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub screen: ScreenId,
    pub path: String,
    pub params: PathParams,
    pub query: QueryParams,
}

impl Resolution {
    /// The `:id` path parameter as a number, when present and numeric.
    pub fn id_param(&self) -> Option<i64> {
        self.params.get("id").and_then(|raw| raw.parse().ok())
    }

    /// The decoded `returnUrl` query parameter, when present.
    pub fn return_url(&self) -> Option<&str> {
        self.query.get("returnUrl").map(String::as_str)
    }
}

/// Resolves requested paths against the route table, applying access guards
/// and following redirects until a screen is reached.
pub struct Navigator {
    table: RouteTable,
}

impl Navigator {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn portal() -> Self {
        Self::new(RouteTable::portal())
    }

    /// Turns a requested path into the screen to display. Guard redirects
    /// and table redirects are followed in place, so the caller always
    /// receives a screen it is allowed to show.
    pub fn resolve(&self, requested: &str, session: &SessionContext) -> Result<Resolution, PortalError> {
        let mut current = normalize(requested);

        for _ in 0..MAX_REDIRECTS {
            let (path, query) = split_query(&current);

            let Some((route, params)) = self.table.match_path(path) else {
                debug!("No route matches {}, redirecting to fallback", path);
                current = self.table.fallback().to_string();
                continue;
            };

            match guard::evaluate(&route.access, session, &current) {
                GuardDecision::Allow => {}
                GuardDecision::RedirectToLogin { return_url } => {
                    debug!("Navigation to {} requires login", path);
                    current = login_path(&return_url);
                    continue;
                }
                GuardDecision::RedirectToUnauthorized => {
                    debug!("Session lacks a required role for {}", path);
                    current = "/unauthorized".to_string();
                    continue;
                }
            }

            match route.target {
                RouteTarget::Screen(screen) => {
                    return Ok(Resolution {
                        screen,
                        path: path.to_string(),
                        params,
                        query: parse_query(query),
                    });
                }
                RouteTarget::Redirect(to) => {
                    debug!("Redirecting {} to {}", path, to);
                    current = to.to_string();
                }
            }
        }

        Err(PortalError::Config(format!(
            "navigation to {requested} exceeded {MAX_REDIRECTS} redirects"
        )))
    }
}

/// Builds the login path carrying the original destination, percent-encoded
/// so nested paths and queries survive the round trip.
pub fn login_path(return_url: &str) -> String {
    format!("/auth/login?returnUrl={}", urlencoding::encode(return_url))
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || !trimmed.starts_with('/') {
        format!("/{trimmed}")
    } else {
        trimmed.to_string()
    }
}

fn split_query(path: &str) -> (&str, &str) {
    match path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path, ""),
    }
}

fn parse_query(raw: &str) -> QueryParams {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let value = urlencoding::decode(value).ok()?;
            Some((key.to_string(), value.into_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_path_encodes_return_url() {
        let path = login_path("/billing/7?page=2");
        assert_eq!(path, "/auth/login?returnUrl=%2Fbilling%2F7%3Fpage%3D2");
    }

    #[test]
    fn test_parse_query_decodes_values() {
        let query = parse_query("returnUrl=%2Fpatients%2F42&tab=visits");
        assert_eq!(query.get("returnUrl").map(String::as_str), Some("/patients/42"));
        assert_eq!(query.get("tab").map(String::as_str), Some("visits"));
    }

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize("dashboard"), "/dashboard");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/patients"), "/patients");
    }
}
