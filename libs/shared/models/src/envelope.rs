use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// The `{success, message, data}` wrapper the auth endpoints use. Resource
/// endpoints return their payloads bare; only authentication goes through
/// this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, turning `success: false` or a missing body into
    /// a gateway validation error carrying the server's message.
    pub fn into_data(self) -> Result<T, PortalError> {
        match self {
            ApiEnvelope { success: true, data: Some(data), .. } => Ok(data),
            ApiEnvelope { message, .. } => Err(PortalError::Validation(
                message.unwrap_or_else(|| "request rejected".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_yields_data() {
        let env: ApiEnvelope<String> = serde_json::from_str(
            r#"{"success": true, "message": "Login successful", "data": "payload"}"#,
        )
        .unwrap();
        assert_eq!(env.into_data().unwrap(), "payload");
    }

    #[test]
    fn failed_envelope_carries_the_server_message() {
        let env: ApiEnvelope<String> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#)
                .unwrap();
        match env.into_data() {
            Err(PortalError::Validation(msg)) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
