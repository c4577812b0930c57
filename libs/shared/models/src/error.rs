use thiserror::Error;

/// Client-side classification of everything that can go wrong between the
/// portal and the gateway. Screens branch on the variant, never on raw
/// status codes.
#[derive(Error, Debug)]
pub enum PortalError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("Gateway unreachable: {0}")]
    Transport(String),

    /// 401 or 403. The session is missing, expired or insufficient; the
    /// shell reacts by routing to the login screen.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// 404 for an addressed entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 or 422. Server-side validation rejected the payload.
    #[error("Validation rejected: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("Gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// The body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    /// Maps a non-success HTTP status plus its body text to a variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => PortalError::Unauthenticated(message),
            404 => PortalError::NotFound(message),
            400 | 422 => PortalError::Validation(message),
            _ => PortalError::Gateway { status, message },
        }
    }

    /// True when the caller should treat the session as gone.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, PortalError::Unauthenticated(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::NotFound(_))
    }

    /// The one-line text a screen surfaces as a notice. Deliberately terse;
    /// the full error is logged where it occurs.
    pub fn notice_text(&self) -> String {
        match self {
            PortalError::Transport(_) => "Service unavailable. Please try again.".to_string(),
            PortalError::Unauthenticated(_) => "Your session has expired. Please log in.".to_string(),
            PortalError::NotFound(_) => "The requested record was not found.".to_string(),
            PortalError::Validation(msg) => format!("Validation failed: {}", msg),
            PortalError::Gateway { status, .. } => format!("The server reported an error ({}).", status),
            PortalError::Decode(_) => "Received an unexpected response from the server.".to_string(),
            PortalError::Config(msg) => format!("Configuration problem: {}", msg),
            PortalError::Io(_) => "A local file operation failed.".to_string(),
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PortalError::Decode(err.to_string())
        } else {
            PortalError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_taxonomy() {
        assert!(PortalError::from_status(401, "no token").is_unauthenticated());
        assert!(PortalError::from_status(403, "wrong role").is_unauthenticated());
        assert!(PortalError::from_status(404, "gone").is_not_found());
        assert!(matches!(
            PortalError::from_status(422, "bad email"),
            PortalError::Validation(_)
        ));
        assert!(matches!(
            PortalError::from_status(500, "boom"),
            PortalError::Gateway { status: 500, .. }
        ));
    }

    #[test]
    fn notices_do_not_leak_internals() {
        let err = PortalError::Transport("connection refused (os error 111)".to_string());
        assert_eq!(err.notice_text(), "Service unavailable. Please try again.");
    }
}
