/// An explicit yes/no answer for destructive row actions. `No` must leave
/// the world untouched; callers return before issuing any request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

impl Confirm {
    pub fn accepted(self) -> bool {
        self == Confirm::Yes
    }

    /// Parses an operator's answer. Anything other than a clear yes or no
    /// is returned as unrecognized so the screen can re-prompt.
    pub fn parse(input: &str) -> Option<Confirm> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Confirm::Yes),
            "n" | "no" => Some(Confirm::No),
            _ => None,
        }
    }
}

/// Holds a destructive action until the operator answers the confirmation
/// prompt. While an action is pending the screen routes the next input
/// here instead of its normal command handling.
#[derive(Debug)]
pub struct ConfirmGate<A> {
    pending: Option<A>,
}

impl<A> Default for ConfirmGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, action: A) {
        self.pending = Some(action);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    /// Resolves the pending action. `Yes` releases it to the caller; `No`
    /// drops it. Either way the gate is clear afterwards.
    pub fn resolve(&mut self, answer: Confirm) -> Option<A> {
        let action = self.pending.take();
        match answer {
            Confirm::Yes => action,
            Confirm::No => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_releases_the_pending_action() {
        let mut gate = ConfirmGate::new();
        gate.request(42);
        assert!(gate.is_pending());
        assert_eq!(gate.resolve(Confirm::Yes), Some(42));
        assert!(!gate.is_pending());
    }

    #[test]
    fn no_drops_the_pending_action() {
        let mut gate = ConfirmGate::new();
        gate.request(42);
        assert_eq!(gate.resolve(Confirm::No), None);
        assert!(!gate.is_pending());
    }

    #[test]
    fn parse_accepts_short_and_long_answers() {
        assert_eq!(Confirm::parse("yes"), Some(Confirm::Yes));
        assert_eq!(Confirm::parse("Y"), Some(Confirm::Yes));
        assert_eq!(Confirm::parse(" no "), Some(Confirm::No));
        assert_eq!(Confirm::parse("maybe"), None);
    }
}
