use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::PortalConfig;
use shared_gateway::GatewayClient;
use shared_models::{Page, PageRequest, PortalError};

use crate::models::{Invoice, InvoiceRequest, InvoiceStatus, Payment};

/// Typed client for the gateway's `/billing` resource.
pub struct BillingClient {
    gateway: GatewayClient,
}

impl BillingClient {
    pub fn new(config: &PortalConfig, token: Option<String>) -> Self {
        let mut gateway = GatewayClient::new(config.gateway_url.clone());
        if let Some(token) = token {
            gateway = gateway.with_bearer(token);
        }
        Self { gateway }
    }

    /// Paged listing, optionally narrowed server-side to one status.
    pub async fn invoices(
        &self,
        page: PageRequest,
        status: Option<InvoiceStatus>,
    ) -> Result<Page<Invoice>, PortalError> {
        let mut query = page.to_query();
        if let Some(status) = status {
            query.push(("status".to_string(), status.to_string()));
        }
        self.gateway
            .request(Method::GET, "/billing/invoices", &query, None)
            .await
    }

    pub async fn invoice(&self, id: i64) -> Result<Invoice, PortalError> {
        self.gateway
            .request(Method::GET, &format!("/billing/invoices/{}", id), &[], None)
            .await
    }

    pub async fn create(&self, request: &InvoiceRequest) -> Result<Invoice, PortalError> {
        debug!("Creating invoice for patient {}", request.patient_id);
        let invoice: Invoice = self
            .gateway
            .request(
                Method::POST,
                "/billing/invoices",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await?;
        info!("Created invoice {}", invoice.invoice_number);
        Ok(invoice)
    }

    pub async fn update(&self, id: i64, request: &InvoiceRequest) -> Result<Invoice, PortalError> {
        debug!("Updating invoice {}", id);
        self.gateway
            .request(
                Method::PUT,
                &format!("/billing/invoices/{}", id),
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    pub async fn by_patient(
        &self,
        patient_id: i64,
        page: PageRequest,
    ) -> Result<Page<Invoice>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/billing/invoices/patient/{}", patient_id),
                &page.to_query(),
                None,
            )
            .await
    }

    /// Posts a payment against an invoice. The gateway answers with the
    /// invoice as it stands after the payment.
    pub async fn record_payment(
        &self,
        invoice_id: i64,
        payment: &Payment,
    ) -> Result<Invoice, PortalError> {
        info!("Recording payment of {} on invoice {}", payment.amount, invoice_id);
        self.gateway
            .request(
                Method::POST,
                &format!("/billing/invoices/{}/payments", invoice_id),
                &[],
                Some(serde_json::to_value(payment)?),
            )
            .await
    }

    pub async fn payments(&self, invoice_id: i64) -> Result<Vec<Payment>, PortalError> {
        self.gateway
            .request(
                Method::GET,
                &format!("/billing/invoices/{}/payments", invoice_id),
                &[],
                None,
            )
            .await
    }

    /// The rendered PDF export for one invoice.
    pub async fn invoice_pdf(&self, id: i64) -> Result<Vec<u8>, PortalError> {
        self.gateway
            .fetch_bytes(&format!("/billing/invoices/{}/pdf", id))
            .await
    }

    /// Revenue summary between two dates. The report shape is free-form.
    pub async fn revenue_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Value, PortalError> {
        let query = vec![
            ("startDate".to_string(), start_date.to_string()),
            ("endDate".to_string(), end_date.to_string()),
        ];
        self.gateway
            .request(Method::GET, "/billing/reports/revenue", &query, None)
            .await
    }
}
