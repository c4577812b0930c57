use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicationCategory {
    Antibiotic,
    Analgesic,
    Antihistamine,
    Antihypertensive,
    Antidiabetic,
    Vitamin,
    Other,
}

impl MedicationCategory {
    pub fn parse(value: &str) -> Option<MedicationCategory> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ANTIBIOTIC" => Some(MedicationCategory::Antibiotic),
            "ANALGESIC" => Some(MedicationCategory::Analgesic),
            "ANTIHISTAMINE" => Some(MedicationCategory::Antihistamine),
            "ANTIHYPERTENSIVE" => Some(MedicationCategory::Antihypertensive),
            "ANTIDIABETIC" => Some(MedicationCategory::Antidiabetic),
            "VITAMIN" => Some(MedicationCategory::Vitamin),
            "OTHER" => Some(MedicationCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MedicationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MedicationCategory::Antibiotic => "ANTIBIOTIC",
            MedicationCategory::Analgesic => "ANALGESIC",
            MedicationCategory::Antihistamine => "ANTIHISTAMINE",
            MedicationCategory::Antihypertensive => "ANTIHYPERTENSIVE",
            MedicationCategory::Antidiabetic => "ANTIDIABETIC",
            MedicationCategory::Vitamin => "VITAMIN",
            MedicationCategory::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DosageForm {
    Tablet,
    Capsule,
    Syrup,
    Injection,
    Cream,
    Ointment,
    Drops,
    Inhaler,
}

impl DosageForm {
    pub fn parse(value: &str) -> Option<DosageForm> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TABLET" => Some(DosageForm::Tablet),
            "CAPSULE" => Some(DosageForm::Capsule),
            "SYRUP" => Some(DosageForm::Syrup),
            "INJECTION" => Some(DosageForm::Injection),
            "CREAM" => Some(DosageForm::Cream),
            "OINTMENT" => Some(DosageForm::Ointment),
            "DROPS" => Some(DosageForm::Drops),
            "INHALER" => Some(DosageForm::Inhaler),
            _ => None,
        }
    }
}

impl fmt::Display for DosageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DosageForm::Tablet => "TABLET",
            DosageForm::Capsule => "CAPSULE",
            DosageForm::Syrup => "SYRUP",
            DosageForm::Injection => "INJECTION",
            DosageForm::Cream => "CREAM",
            DosageForm::Ointment => "OINTMENT",
            DosageForm::Drops => "DROPS",
            DosageForm::Inhaler => "INHALER",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub category: MedicationCategory,
    pub dosage_form: DosageForm,
    pub strength: String,
    pub unit_price: f64,
    pub requires_prescription: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    pub name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub category: MedicationCategory,
    pub dosage_form: DosageForm,
    pub strength: String,
    pub unit_price: f64,
    pub requires_prescription: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contraindications: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Pending,
    Dispensed,
    PartiallyDispensed,
    Cancelled,
}

impl PrescriptionStatus {
    pub fn parse(value: &str) -> Option<PrescriptionStatus> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(PrescriptionStatus::Pending),
            "DISPENSED" => Some(PrescriptionStatus::Dispensed),
            "PARTIALLY_DISPENSED" => Some(PrescriptionStatus::PartiallyDispensed),
            "CANCELLED" => Some(PrescriptionStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrescriptionStatus::Pending => "PENDING",
            PrescriptionStatus::Dispensed => "DISPENSED",
            PrescriptionStatus::PartiallyDispensed => "PARTIALLY_DISPENSED",
            PrescriptionStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub medication_id: i64,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: i64,
    pub prescription_number: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    pub items: Vec<PrescriptionItem>,
    pub status: PrescriptionStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub prescribed_date: NaiveDate,
    #[serde(default)]
    pub dispensed_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Prescription {
    /// Dispensing is one-way and only applies to pending prescriptions.
    pub fn can_dispense(&self) -> bool {
        self.status == PrescriptionStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<i64>,
    pub items: Vec<PrescriptionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub prescribed_date: NaiveDate,
}

/// A stock batch. The stock state shown on screen is derived from quantity
/// and reorder level; the gateway stores no status field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub medication_id: i64,
    pub medication_name: String,
    pub batch_number: String,
    pub quantity: u32,
    pub reorder_level: u32,
    pub expiry_date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl InventoryItem {
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    pub fn stock_label(&self) -> &'static str {
        if self.is_out_of_stock() {
            "Out of Stock"
        } else if self.is_low_stock() {
            "Low Stock"
        } else {
            "In Stock"
        }
    }

    /// Expiry within 90 days of the given day counts as expiring soon.
    pub fn expires_soon(&self, today: NaiveDate) -> bool {
        self.expiry_date <= today + Duration::days(90)
    }
}
