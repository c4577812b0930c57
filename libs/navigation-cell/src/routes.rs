use std::collections::HashMap;

use session_cell::models::Role;

// ============================================================================
// SCREEN IDENTIFIERS
// ============================================================================

/// Every screen the portal can display. The shell maps these to concrete
/// screen implementations; nothing below the shell constructs screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Login,
    Unauthorized,
    Dashboard,
    PatientList,
    PatientDetail,
    PatientForm,
    AppointmentList,
    AppointmentDetail,
    AppointmentForm,
    InvoiceList,
    InvoiceDetail,
    InvoiceForm,
    MedicationList,
    PrescriptionList,
    Inventory,
}

// ============================================================================
// ROUTE PATTERNS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern made of literal and `:name` parameter segments, for
/// example `/patients/:id/edit`. Matching is exact on segment count.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

pub type PathParams = HashMap<String, String>;

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Matches a path (without query string) against this pattern,
    /// returning the captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

// ============================================================================
// ROUTE TABLE
// ============================================================================

/// What a matched route resolves to.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    Screen(ScreenId),
    Redirect(&'static str),
}

/// Roles admitted to the billing section. The shell reads these too, so
/// the navigation chrome always agrees with the guard.
pub const BILLING_ROLES: &[Role] = &[Role::Admin, Role::Receptionist];

/// Roles admitted to the pharmacy section.
pub const PHARMACY_ROLES: &[Role] = &[Role::Admin, Role::Doctor, Role::Pharmacist];

/// Who may activate a route. Redirect routes are declared `Public`; access
/// is enforced where the redirect lands, so the login return URL always
/// names a real screen.
#[derive(Debug, Clone)]
pub enum RouteAccess {
    Public,
    Authenticated,
    AnyRole(&'static [Role]),
}

#[derive(Debug, Clone)]
pub struct Route {
    pattern: RoutePattern,
    pub target: RouteTarget,
    pub access: RouteAccess,
}

impl Route {
    pub fn new(pattern: &str, target: RouteTarget, access: RouteAccess) -> Self {
        Self {
            pattern: RoutePattern::parse(pattern),
            target,
            access,
        }
    }
}

/// The portal's route table. Declaration order is match order, so literal
/// routes like `/patients/new` must precede their `/:id` siblings.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: &'static str,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>, fallback: &'static str) -> Self {
        Self { routes, fallback }
    }

    /// Redirect target for paths no route matches.
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    pub fn match_path(&self, path: &str) -> Option<(&Route, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    /// Every route the portal serves, in one place.
    pub fn portal() -> Self {
        use RouteAccess::{AnyRole, Authenticated, Public};
        use RouteTarget::{Redirect, Screen};

        let routes = vec![
            Route::new("/", Redirect("/dashboard"), Public),
            Route::new("/auth/login", Screen(ScreenId::Login), Public),
            Route::new("/unauthorized", Screen(ScreenId::Unauthorized), Public),
            Route::new("/dashboard", Screen(ScreenId::Dashboard), Authenticated),
            Route::new("/patients", Screen(ScreenId::PatientList), Authenticated),
            Route::new("/patients/new", Screen(ScreenId::PatientForm), Authenticated),
            Route::new("/patients/:id", Screen(ScreenId::PatientDetail), Authenticated),
            Route::new(
                "/patients/:id/edit",
                Screen(ScreenId::PatientForm),
                Authenticated,
            ),
            Route::new(
                "/appointments",
                Screen(ScreenId::AppointmentList),
                Authenticated,
            ),
            Route::new(
                "/appointments/new",
                Screen(ScreenId::AppointmentForm),
                Authenticated,
            ),
            Route::new(
                "/appointments/:id",
                Screen(ScreenId::AppointmentDetail),
                Authenticated,
            ),
            Route::new(
                "/appointments/:id/edit",
                Screen(ScreenId::AppointmentForm),
                Authenticated,
            ),
            Route::new("/billing", Screen(ScreenId::InvoiceList), AnyRole(BILLING_ROLES)),
            Route::new(
                "/billing/new",
                Screen(ScreenId::InvoiceForm),
                AnyRole(BILLING_ROLES),
            ),
            Route::new(
                "/billing/:id",
                Screen(ScreenId::InvoiceDetail),
                AnyRole(BILLING_ROLES),
            ),
            Route::new("/pharmacy", Redirect("/pharmacy/medications"), Public),
            Route::new(
                "/pharmacy/medications",
                Screen(ScreenId::MedicationList),
                AnyRole(PHARMACY_ROLES),
            ),
            Route::new(
                "/pharmacy/prescriptions",
                Screen(ScreenId::PrescriptionList),
                AnyRole(PHARMACY_ROLES),
            ),
            Route::new(
                "/pharmacy/inventory",
                Screen(ScreenId::Inventory),
                AnyRole(PHARMACY_ROLES),
            ),
        ];

        Self::new(routes, "/dashboard")
    }
}
