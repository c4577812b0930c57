use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::PortalConfig;
use shared_gateway::GatewayClient;
use shared_models::{Page, PageRequest, PortalError};

use crate::models::{Patient, PatientRequest, PatientSearchCriteria};

/// Typed client for the gateway's `/patients` resource.
pub struct PatientClient {
    gateway: GatewayClient,
}

impl PatientClient {
    pub fn new(config: &PortalConfig, token: Option<String>) -> Self {
        let mut gateway = GatewayClient::new(config.gateway_url.clone());
        if let Some(token) = token {
            gateway = gateway.with_bearer(token);
        }
        Self { gateway }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Patient>, PortalError> {
        self.gateway
            .request(Method::GET, "/patients", &page.to_query(), None)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Patient, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/patients/{}", id), &[], None)
            .await
    }

    pub async fn create(&self, request: &PatientRequest) -> Result<Patient, PortalError> {
        debug!("Creating patient record for {}", request.email);
        let patient: Patient = self
            .gateway
            .request(Method::POST, "/patients", &[], Some(serde_json::to_value(request)?))
            .await?;
        info!("Created patient {}", patient.id);
        Ok(patient)
    }

    pub async fn update(&self, id: i64, request: &PatientRequest) -> Result<Patient, PortalError> {
        debug!("Updating patient {}", id);
        self.gateway
            .request(
                Method::PUT,
                &format!("/patients/{}", id),
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), PortalError> {
        info!("Deleting patient {}", id);
        self.gateway
            .request_no_content(Method::DELETE, &format!("/patients/{}", id), None)
            .await
    }

    /// Server-side search. Criteria fields become query parameters alongside
    /// the page request.
    pub async fn search(
        &self,
        criteria: &PatientSearchCriteria,
        page: PageRequest,
    ) -> Result<Page<Patient>, PortalError> {
        let mut query = criteria.to_query();
        query.extend(page.to_query());
        self.gateway
            .request(Method::GET, "/patients/search", &query, None)
            .await
    }

    /// Visit history entries for one patient. The endpoint has no fixed
    /// schema, so entries come back as raw JSON objects.
    pub async fn medical_history(&self, id: i64) -> Result<Vec<Value>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/patients/{}/medical-history", id),
                &[],
                None,
            )
            .await
    }
}
