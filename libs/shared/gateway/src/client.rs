use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_models::PortalError;

/// The one HTTP wrapper every resource client goes through. Holds the
/// gateway base URL and, when a session exists, the bearer token to attach.
///
/// Requests are single-shot. A failure is mapped to a `PortalError` variant
/// and returned; nothing here retries.
pub struct GatewayClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response, PortalError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut req = self.client.request(method, &url);

        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Gateway error ({}) for {}: {}", status, path, text);
            return Err(PortalError::from_status(status.as_u16(), extract_message(&text)));
        }

        Ok(response)
    }

    /// Issues a request and decodes the JSON body into `T`.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, query, body.as_ref()).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Issues a request whose response body, if any, is ignored. Used for
    /// deletes and fire-and-forget status changes.
    pub async fn request_no_content(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), PortalError> {
        self.send(method, path, &[], body.as_ref()).await?;
        Ok(())
    }

    /// Fetches a raw binary body (the invoice PDF export).
    pub async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, PortalError> {
        let response = self.send(Method::GET, path, &[], None).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Pulls the `message` field out of a JSON error body when there is one,
/// otherwise passes the raw text through.
fn extract_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_message_from_json_error_bodies() {
        assert_eq!(
            extract_message(r#"{"message": "Email already registered"}"#),
            "Email already registered"
        );
        assert_eq!(extract_message("plain text error"), "plain text error");
        assert_eq!(extract_message(""), "");
    }

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let client = GatewayClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
