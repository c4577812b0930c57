use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::PortalConfig;
use shared_gateway::GatewayClient;
use shared_models::{Page, PageRequest, PortalError};

use crate::models::{Appointment, AppointmentRequest, AppointmentStatus};

/// Typed client for the gateway's `/appointments` resource.
pub struct AppointmentClient {
    gateway: GatewayClient,
}

impl AppointmentClient {
    pub fn new(config: &PortalConfig, token: Option<String>) -> Self {
        let mut gateway = GatewayClient::new(config.gateway_url.clone());
        if let Some(token) = token {
            gateway = gateway.with_bearer(token);
        }
        Self { gateway }
    }

    /// Paged listing, optionally narrowed server-side to one status.
    pub async fn list(
        &self,
        page: PageRequest,
        status: Option<AppointmentStatus>,
    ) -> Result<Page<Appointment>, PortalError> {
        let mut query = page.to_query();
        if let Some(status) = status {
            query.push(("status".to_string(), status.to_string()));
        }
        self.gateway
            .request(Method::GET, "/appointments", &query, None)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/appointments/{}", id), &[], None)
            .await
    }

    pub async fn create(&self, request: &AppointmentRequest) -> Result<Appointment, PortalError> {
        debug!(
            "Booking appointment for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );
        let appointment: Appointment = self
            .gateway
            .request(
                Method::POST,
                "/appointments",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await?;
        info!("Booked appointment {}", appointment.id);
        Ok(appointment)
    }

    pub async fn update(
        &self,
        id: i64,
        request: &AppointmentRequest,
    ) -> Result<Appointment, PortalError> {
        debug!("Updating appointment {}", id);
        self.gateway
            .request(
                Method::PUT,
                &format!("/appointments/{}", id),
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    pub async fn cancel(&self, id: i64) -> Result<Appointment, PortalError> {
        info!("Cancelling appointment {}", id);
        self.status_change(id, "cancel").await
    }

    pub async fn confirm(&self, id: i64) -> Result<Appointment, PortalError> {
        info!("Confirming appointment {}", id);
        self.status_change(id, "confirm").await
    }

    pub async fn complete(&self, id: i64) -> Result<Appointment, PortalError> {
        info!("Completing appointment {}", id);
        self.status_change(id, "complete").await
    }

    /// The gateway models status changes as PATCH sub-resources with an empty
    /// body, each returning the updated appointment.
    async fn status_change(&self, id: i64, action: &str) -> Result<Appointment, PortalError> {
        self.gateway
            .request(
                Method::PATCH,
                &format!("/appointments/{}/{}", id, action),
                &[],
                Some(json!({})),
            )
            .await
    }

    pub async fn by_patient(
        &self,
        patient_id: i64,
        page: PageRequest,
    ) -> Result<Page<Appointment>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/appointments/patient/{}", patient_id),
                &page.to_query(),
                None,
            )
            .await
    }

    pub async fn by_doctor(
        &self,
        doctor_id: i64,
        page: PageRequest,
    ) -> Result<Page<Appointment>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/appointments/doctor/{}", doctor_id),
                &page.to_query(),
                None,
            )
            .await
    }

    /// Day schedule. Unpaged; the gateway returns a plain array.
    pub async fn on_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/appointments/date/{}", date), &[], None)
            .await
    }

    /// Free time slots for a doctor on a day, as `HH:MM` strings.
    pub async fn available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<String>, PortalError> {
        let query = vec![
            ("doctorId".to_string(), doctor_id.to_string()),
            ("date".to_string(), date.to_string()),
        ];
        self.gateway
            .request(Method::GET, "/appointments/available-slots", &query, None)
            .await
    }
}
