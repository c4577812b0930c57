use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::PortalConfig;
use shared_gateway::GatewayClient;
use shared_models::{ApiEnvelope, PortalError};

use crate::models::{AuthResponse, RegisterRequest, Session};

/// Talks to the gateway's auth endpoints. Responses come wrapped in the
/// `{success, message, data}` envelope; the role is read from the issued
/// token's claims, not from the response body.
pub struct AuthClient {
    gateway: GatewayClient,
}

impl AuthClient {
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            gateway: GatewayClient::new(config.auth_url.clone()),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, PortalError> {
        debug!("Logging in as {}", username);

        let envelope: ApiEnvelope<AuthResponse> = self
            .gateway
            .request(
                Method::POST,
                "/login",
                &[],
                Some(json!({
                    "username": username,
                    "password": password,
                })),
            )
            .await?;

        let auth = envelope.into_data()?;
        let session = Session::from_token(auth.token)
            .map_err(PortalError::Decode)?;

        info!("Login succeeded for {}", session.username);
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, PortalError> {
        debug!("Registering user {}", request.username);

        let envelope: ApiEnvelope<AuthResponse> = self
            .gateway
            .request(
                Method::POST,
                "/register",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await?;

        let auth = envelope.into_data()?;
        Session::from_token(auth.token).map_err(PortalError::Decode)
    }
}
