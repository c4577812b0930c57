use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Gender> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MALE" | "M" => Some(Gender::Male),
            "FEMALE" | "F" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub medical_notes: Option<String>,
    #[serde(default)]
    pub insurance_info: Option<InsuranceInfo>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create/update payload. Optional groups are omitted from the body when
/// the form left them blank; the gateway applies its own validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_info: Option<InsuranceInfo>,
}

/// Search terms for `/patients/search`. Every populated field becomes a
/// query parameter, mirroring what the search endpoint accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientSearchCriteria {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PatientSearchCriteria {
    /// The list screen's quick search: one term matched against first name.
    pub fn by_name(term: impl Into<String>) -> Self {
        Self {
            first_name: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(first_name) = &self.first_name {
            query.push(("firstName".to_string(), first_name.clone()));
        }
        if let Some(last_name) = &self.last_name {
            query.push(("lastName".to_string(), last_name.clone()));
        }
        if let Some(email) = &self.email {
            query.push(("email".to_string(), email.clone()));
        }
        if let Some(phone) = &self.phone {
            query.push(("phone".to_string(), phone.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_deserializes_from_gateway_shape() {
        let raw = r#"{
            "id": 1,
            "firstName": "Alice",
            "lastName": "Reed",
            "email": "alice.reed@example.com",
            "phone": "555-0100",
            "dateOfBirth": "1985-04-12",
            "gender": "FEMALE",
            "address": {
                "street": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zipCode": "62701",
                "country": "USA"
            },
            "emergencyContact": {
                "name": "Sam Reed",
                "relationship": "Spouse",
                "phone": "555-0101"
            },
            "bloodType": "O+",
            "allergies": ["Penicillin"],
            "createdAt": "2024-01-01T00:00:00"
        }"#;

        let patient: Patient = serde_json::from_str(raw).unwrap();
        assert_eq!(patient.full_name(), "Alice Reed");
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.address.zip_code, "62701");
        assert!(patient.insurance_info.is_none());
    }

    #[test]
    fn test_request_omits_blank_groups() {
        let request = PatientRequest {
            first_name: "Alice".to_string(),
            last_name: "Reed".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            gender: Gender::Female,
            address: None,
            emergency_contact: None,
            blood_type: None,
            allergies: None,
            medical_notes: None,
            insurance_info: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["firstName"], "Alice");
        assert_eq!(body["dateOfBirth"], "1985-04-12");
        assert!(body.get("address").is_none());
        assert!(body.get("insuranceInfo").is_none());
    }

    #[test]
    fn test_search_criteria_renders_query_pairs() {
        let criteria = PatientSearchCriteria {
            first_name: Some("ali".to_string()),
            phone: Some("555".to_string()),
            ..Default::default()
        };
        assert_eq!(
            criteria.to_query(),
            vec![
                ("firstName".to_string(), "ali".to_string()),
                ("phone".to_string(), "555".to_string())
            ]
        );
        assert!(PatientSearchCriteria::default().is_empty());
    }

    #[test]
    fn test_gender_parses_common_spellings() {
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse(" M "), Some(Gender::Male));
        assert_eq!(Gender::parse("unknown"), None);
    }
}
