use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::PortalConfig;
use shared_gateway::GatewayClient;
use shared_models::{Page, PageRequest, PortalError};

use crate::models::{
    InventoryItem, Medication, MedicationRequest, Prescription, PrescriptionRequest,
};

/// Typed client for the gateway's `/pharmacy` resource: medications,
/// prescriptions and stock inventory.
pub struct PharmacyClient {
    gateway: GatewayClient,
}

impl PharmacyClient {
    pub fn new(config: &PortalConfig, token: Option<String>) -> Self {
        let mut gateway = GatewayClient::new(config.gateway_url.clone());
        if let Some(token) = token {
            gateway = gateway.with_bearer(token);
        }
        Self { gateway }
    }

    pub async fn medications(&self, page: PageRequest) -> Result<Page<Medication>, PortalError> {
        self.gateway
            .request(Method::GET, "/pharmacy/medications", &page.to_query(), None)
            .await
    }

    pub async fn medication(&self, id: i64) -> Result<Medication, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/pharmacy/medications/{}", id), &[], None)
            .await
    }

    pub async fn create_medication(
        &self,
        request: &MedicationRequest,
    ) -> Result<Medication, PortalError> {
        let medication: Medication = self
            .gateway
            .request(
                Method::POST,
                "/pharmacy/medications",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await?;
        info!("Added medication {}", medication.name);
        Ok(medication)
    }

    pub async fn update_medication(
        &self,
        id: i64,
        request: &MedicationRequest,
    ) -> Result<Medication, PortalError> {
        debug!("Updating medication {}", id);
        self.gateway
            .request(
                Method::PUT,
                &format!("/pharmacy/medications/{}", id),
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    /// Name search. Unlike the listing this endpoint returns a plain array.
    pub async fn search_medications(&self, query: &str) -> Result<Vec<Medication>, PortalError> {
        debug!("Searching medications for {:?}", query);
        let terms = vec![("query".to_string(), query.to_string())];
        self.gateway
            .request(Method::GET, "/pharmacy/medications/search", &terms, None)
            .await
    }

    pub async fn prescriptions(&self, page: PageRequest) -> Result<Page<Prescription>, PortalError> {
        self.gateway
            .request(Method::GET, "/pharmacy/prescriptions", &page.to_query(), None)
            .await
    }

    pub async fn prescription(&self, id: i64) -> Result<Prescription, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/pharmacy/prescriptions/{}", id), &[], None)
            .await
    }

    pub async fn create_prescription(
        &self,
        request: &PrescriptionRequest,
    ) -> Result<Prescription, PortalError> {
        let prescription: Prescription = self
            .gateway
            .request(
                Method::POST,
                "/pharmacy/prescriptions",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await?;
        info!("Created prescription {}", prescription.prescription_number);
        Ok(prescription)
    }

    /// One-way status change. The gateway models it as a PATCH sub-resource
    /// with an empty body and answers with the updated prescription.
    pub async fn dispense(&self, id: i64) -> Result<Prescription, PortalError> {
        let prescription: Prescription = self
            .gateway
            .request(
                Method::PATCH,
                &format!("/pharmacy/prescriptions/{}/dispense", id),
                &[],
                Some(json!({})),
            )
            .await?;
        info!("Dispensed prescription {}", prescription.prescription_number);
        Ok(prescription)
    }

    /// A patient's prescriptions, newest first, as a plain array.
    pub async fn prescriptions_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Prescription>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/pharmacy/prescriptions/patient/{}", patient_id),
                &[],
                None,
            )
            .await
    }

    pub async fn inventory(&self, page: PageRequest) -> Result<Page<InventoryItem>, PortalError> {
        self.gateway
            .request(Method::GET, "/pharmacy/inventory", &page.to_query(), None)
            .await
    }

    /// Corrects the on-hand quantity of one batch.
    pub async fn adjust_quantity(
        &self,
        id: i64,
        quantity: u32,
    ) -> Result<InventoryItem, PortalError> {
        debug!("Adjusting inventory {} to quantity {}", id, quantity);
        self.gateway
            .request(
                Method::PATCH,
                &format!("/pharmacy/inventory/{}", id),
                &[],
                Some(json!({ "quantity": quantity })),
            )
            .await
    }

    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, PortalError> {
        self.gateway
            .request(Method::GET, "/pharmacy/inventory/low-stock", &[], None)
            .await
    }

    pub async fn add_stock(
        &self,
        medication_id: i64,
        quantity: u32,
        batch_number: &str,
        expiry_date: NaiveDate,
    ) -> Result<InventoryItem, PortalError> {
        let item: InventoryItem = self
            .gateway
            .request(
                Method::POST,
                "/pharmacy/inventory/add-stock",
                &[],
                Some(json!({
                    "medicationId": medication_id,
                    "quantity": quantity,
                    "batchNumber": batch_number,
                    "expiryDate": expiry_date,
                })),
            )
            .await?;
        info!("Added {} units of {} to stock", quantity, item.medication_name);
        Ok(item)
    }
}
