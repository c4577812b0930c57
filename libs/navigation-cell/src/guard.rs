use session_cell::context::SessionContext;

use crate::routes::RouteAccess;

/// Outcome of an access check. Produced from the session and the route
/// alone; evaluating a guard never mutates anything, so checking the same
/// navigation twice yields the same answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Not logged in. `return_url` is the full requested path, query
    /// included, so login can send the user back where they were headed.
    RedirectToLogin { return_url: String },
    /// Logged in, but none of the required roles.
    RedirectToUnauthorized,
}

/// Decides whether the current session may activate a route. `requested`
/// is the path the user asked for, carried into the login redirect verbatim.
pub fn evaluate(access: &RouteAccess, session: &SessionContext, requested: &str) -> GuardDecision {
    match access {
        RouteAccess::Public => GuardDecision::Allow,
        RouteAccess::Authenticated => {
            if session.is_authenticated() {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToLogin {
                    return_url: requested.to_string(),
                }
            }
        }
        RouteAccess::AnyRole(roles) => {
            if !session.is_authenticated() {
                GuardDecision::RedirectToLogin {
                    return_url: requested.to_string(),
                }
            } else if session.has_any_role(roles) {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToUnauthorized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_cell::models::{Role, Session};
    use shared_utils::test_utils::TestUser;

    fn authenticated(user: TestUser) -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.establish(Session::from_token(user.token()).unwrap());
        ctx
    }

    #[test]
    fn test_public_route_allows_anyone() {
        let ctx = SessionContext::new();
        assert_eq!(
            evaluate(&RouteAccess::Public, &ctx, "/auth/login"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_unauthenticated_is_sent_to_login_with_return_url() {
        let ctx = SessionContext::new();
        let decision = evaluate(&RouteAccess::Authenticated, &ctx, "/patients/42?page=2");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                return_url: "/patients/42?page=2".to_string()
            }
        );
    }

    #[test]
    fn test_expired_session_is_treated_as_unauthenticated() {
        let mut ctx = SessionContext::new();
        ctx.establish(Session::from_token(TestUser::admin().expired_token()).unwrap());

        let decision = evaluate(&RouteAccess::Authenticated, &ctx, "/dashboard");
        assert!(matches!(decision, GuardDecision::RedirectToLogin { .. }));
    }

    #[test]
    fn test_authenticated_user_passes_authenticated_route() {
        let ctx = authenticated(TestUser::doctor());
        assert_eq!(
            evaluate(&RouteAccess::Authenticated, &ctx, "/appointments"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_role_route_rejects_disjoint_role() {
        let ctx = authenticated(TestUser::doctor());
        let decision = evaluate(
            &RouteAccess::AnyRole(&[Role::Admin, Role::Receptionist]),
            &ctx,
            "/billing",
        );
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
    }

    #[test]
    fn test_role_route_accepts_any_single_required_role() {
        let receptionist = authenticated(TestUser::receptionist());
        assert_eq!(
            evaluate(
                &RouteAccess::AnyRole(&[Role::Admin, Role::Receptionist]),
                &receptionist,
                "/billing",
            ),
            GuardDecision::Allow
        );

        let pharmacist = authenticated(TestUser::pharmacist());
        assert_eq!(
            evaluate(
                &RouteAccess::AnyRole(&[Role::Admin, Role::Doctor, Role::Pharmacist]),
                &pharmacist,
                "/pharmacy/medications",
            ),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_role_route_checks_login_before_roles() {
        let ctx = SessionContext::new();
        let decision = evaluate(
            &RouteAccess::AnyRole(&[Role::Admin, Role::Receptionist]),
            &ctx,
            "/billing/7",
        );
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                return_url: "/billing/7".to_string()
            }
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let ctx = authenticated(TestUser::nurse());
        let access = RouteAccess::AnyRole(&[Role::Admin, Role::Receptionist]);
        let first = evaluate(&access, &ctx, "/billing");
        let second = evaluate(&access, &ctx, "/billing");
        assert_eq!(first, second);
        assert_eq!(first, GuardDecision::RedirectToUnauthorized);
    }
}
