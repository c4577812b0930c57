use crate::models::{Role, Session};

/// The one place the current session lives. Constructed by the shell at
/// startup and lent read-only to whoever needs an answer; only the shell's
/// login and logout paths mutate it. An expired session reads as
/// unauthenticated everywhere without being actively cleared.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&mut self, session: Session) {
        self.current = Some(session);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The live session, or `None` when absent or expired.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref().filter(|s| !s.is_expired())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.current().map(|s| s.username.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.current().map(|s| s.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.current().and_then(|s| s.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current().map(|s| s.has_role(role)).unwrap_or(false)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use shared_utils::test_utils::TestUser;

    #[test]
    fn empty_context_is_unauthenticated() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_authenticated());
        assert!(ctx.username().is_none());
        assert!(!ctx.has_any_role(&[Role::Admin, Role::Doctor]));
    }

    #[test]
    fn established_session_answers_role_queries() {
        let mut ctx = SessionContext::new();
        ctx.establish(Session::from_token(TestUser::receptionist().token()).unwrap());

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.username(), Some("frontdesk"));
        assert!(ctx.has_role(Role::Receptionist));
        assert!(!ctx.has_role(Role::Admin));
        assert!(ctx.has_any_role(&[Role::Admin, Role::Receptionist]));
    }

    #[test]
    fn expired_session_reads_as_unauthenticated() {
        let mut ctx = SessionContext::new();
        ctx.establish(Session::from_token(TestUser::admin().expired_token()).unwrap());

        assert!(!ctx.is_authenticated());
        assert!(ctx.token().is_none());
        assert!(!ctx.has_role(Role::Admin));
    }

    #[test]
    fn clear_logs_out() {
        let mut ctx = SessionContext::new();
        ctx.establish(Session::from_token(TestUser::admin().token()).unwrap());
        ctx.clear();
        assert!(!ctx.is_authenticated());
    }
}
