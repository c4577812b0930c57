use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn parse(value: &str) -> Option<InvoiceStatus> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Some(InvoiceStatus::Draft),
            "PENDING" => Some(InvoiceStatus::Pending),
            "PARTIAL" => Some(InvoiceStatus::Partial),
            "PAID" => Some(InvoiceStatus::Paid),
            "OVERDUE" => Some(InvoiceStatus::Overdue),
            "CANCELLED" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Partial => "PARTIAL",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    Consultation,
    Procedure,
    Medication,
    LabTest,
    RoomCharge,
    Other,
}

impl ItemCategory {
    pub fn parse(value: &str) -> Option<ItemCategory> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONSULTATION" => Some(ItemCategory::Consultation),
            "PROCEDURE" => Some(ItemCategory::Procedure),
            "MEDICATION" => Some(ItemCategory::Medication),
            "LAB_TEST" => Some(ItemCategory::LabTest),
            "ROOM_CHARGE" => Some(ItemCategory::RoomCharge),
            "OTHER" => Some(ItemCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemCategory::Consultation => "CONSULTATION",
            ItemCategory::Procedure => "PROCEDURE",
            ItemCategory::Medication => "MEDICATION",
            ItemCategory::LabTest => "LAB_TEST",
            ItemCategory::RoomCharge => "ROOM_CHARGE",
            ItemCategory::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Insurance,
    BankTransfer,
    Check,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<PaymentMethod> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Some(PaymentMethod::Cash),
            "CREDIT_CARD" | "CREDIT" => Some(PaymentMethod::CreditCard),
            "DEBIT_CARD" | "DEBIT" => Some(PaymentMethod::DebitCard),
            "INSURANCE" => Some(PaymentMethod::Insurance),
            "BANK_TRANSFER" | "TRANSFER" => Some(PaymentMethod::BankTransfer),
            "CHECK" => Some(PaymentMethod::Check),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::Insurance => "INSURANCE",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Check => "CHECK",
        };
        write!(f, "{}", s)
    }
}

/// One invoice line. `amount` comes from the gateway on reads; on writes the
/// form computes it as quantity times unit price, as the original billing
/// form did.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub amount: f64,
    pub category: ItemCategory,
}

/// An invoice exactly as the gateway states it. All monetary fields are
/// authoritative; the portal displays them without recomputing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub patient_id: i64,
    pub patient_name: String,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Invoice {
    /// Payments can be recorded while something is still owed.
    pub fn is_payable(&self) -> bool {
        self.balance_amount > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i64>,
    pub items: Vec<InvoiceItem>,
    pub discount_amount: f64,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub invoice_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
    pub payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoice_keeps_the_gateway_arithmetic_verbatim() {
        // Totals that do not add up stay exactly as sent.
        let invoice: Invoice = serde_json::from_value(json!({
            "id": 1,
            "invoiceNumber": "INV-2025-0001",
            "patientId": 1,
            "patientName": "Alice Reed",
            "items": [{
                "id": 1,
                "description": "Consultation",
                "quantity": 2,
                "unitPrice": 30.0,
                "amount": 60.0,
                "category": "CONSULTATION"
            }],
            "subtotal": 100.0,
            "taxAmount": 0.0,
            "discountAmount": 0.0,
            "totalAmount": 170.0,
            "paidAmount": 100.0,
            "balanceAmount": 70.0,
            "status": "PARTIAL",
            "dueDate": "2025-07-01"
        }))
        .unwrap();

        assert_eq!(invoice.subtotal, 100.0);
        assert_eq!(invoice.total_amount, 170.0);
        assert_eq!(invoice.balance_amount, 70.0);
        assert!(invoice.is_payable());
    }

    #[test]
    fn test_settled_invoice_is_not_payable() {
        let mut invoice: Invoice = serde_json::from_value(json!({
            "id": 1, "invoiceNumber": "INV-2025-0001", "patientId": 1,
            "patientName": "A", "items": [], "subtotal": 50.0, "taxAmount": 0.0,
            "discountAmount": 0.0, "totalAmount": 50.0, "paidAmount": 50.0,
            "balanceAmount": 0.0, "status": "PAID", "dueDate": "2025-07-01"
        }))
        .unwrap();

        assert!(!invoice.is_payable());
        invoice.balance_amount = 10.0;
        assert!(invoice.is_payable());
    }

    #[test]
    fn test_status_parse_round_trips_display() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Pending,
            InvoiceStatus::Partial,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(&status.to_string()), Some(status));
        }
    }

    #[test]
    fn test_item_id_is_omitted_on_create_bodies() {
        let item = InvoiceItem {
            id: None,
            description: "X-ray".to_string(),
            quantity: 1,
            unit_price: 80.0,
            amount: 80.0,
            category: ItemCategory::Procedure,
        };
        let body = serde_json::to_value(&item).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["category"], "PROCEDURE");
    }
}
