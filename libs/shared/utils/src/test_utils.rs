use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use serde_json::json;

use shared_config::PortalConfig;

/// Builds a `PortalConfig` pointed at a mock gateway.
pub struct TestConfig {
    pub gateway_url: String,
}

impl TestConfig {
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self { gateway_url: gateway_url.into() }
    }

    pub fn to_portal_config(&self) -> PortalConfig {
        PortalConfig {
            gateway_url: self.gateway_url.clone(),
            auth_url: format!("{}/auth", self.gateway_url.trim_end_matches('/')),
            session_file: ".ihms-session-test".to_string(),
            download_dir: ".".to_string(),
            default_page_size: 10,
        }
    }
}

pub struct TestUser {
    pub username: String,
    pub role: String,
}

impl TestUser {
    pub fn new(username: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            role: role.to_string(),
        }
    }

    pub fn admin() -> Self {
        Self::new("admin1", "ADMIN")
    }

    pub fn doctor() -> Self {
        Self::new("drhouse", "DOCTOR")
    }

    pub fn nurse() -> Self {
        Self::new("nurse1", "NURSE")
    }

    pub fn pharmacist() -> Self {
        Self::new("pharm1", "PHARMACIST")
    }

    pub fn receptionist() -> Self {
        Self::new("frontdesk", "RECEPTIONIST")
    }

    /// A well-formed token carrying this user's claims, valid for a day.
    /// The signature segment is junk; the portal never verifies it.
    pub fn token(&self) -> String {
        JwtTestUtils::create_test_token(self, Some(24))
    }

    pub fn expired_token(&self) -> String {
        JwtTestUtils::create_test_token(self, Some(-1))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.username,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature_encoded = URL_SAFE_NO_PAD.encode("test-signature");

        format!("{}.{}.{}", header_encoded, payload_encoded, signature_encoded)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token".to_string()
    }
}

/// Canned gateway payloads for wiremock-backed tests. Shapes match the
/// gateway's camelCase DTOs exactly; tests override the fields they care
/// about by construction arguments.
pub struct MockGatewayResponses;

impl MockGatewayResponses {
    /// A Spring page envelope around `content`, with the derived flags the
    /// real gateway sends.
    pub fn page(
        content: Vec<serde_json::Value>,
        total_elements: u64,
        number: u32,
        size: u32,
    ) -> serde_json::Value {
        let total_pages = if size == 0 {
            0
        } else {
            ((total_elements + size as u64 - 1) / size as u64) as u32
        };
        json!({
            "content": content,
            "totalElements": total_elements,
            "totalPages": total_pages,
            "size": size,
            "number": number,
            "first": number == 0,
            "last": total_pages == 0 || number + 1 >= total_pages
        })
    }

    pub fn patient_response(id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "email": format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
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
            "medicalNotes": null,
            "insuranceInfo": null,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn appointment_response(id: i64, patient_id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patientId": patient_id,
            "patientName": "Alice Reed",
            "doctorId": 1,
            "doctorName": "Dr. Miriam Osei",
            "departmentId": 1,
            "departmentName": "General Medicine",
            "appointmentDate": "2025-06-15",
            "appointmentTime": "10:30",
            "duration": 30,
            "status": status,
            "type": "CONSULTATION",
            "reason": "Routine visit",
            "notes": null,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn invoice_response(
        id: i64,
        patient_id: i64,
        status: &str,
        total: f64,
        balance: f64,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "invoiceNumber": format!("INV-2025-{:04}", id),
            "patientId": patient_id,
            "patientName": "Alice Reed",
            "appointmentId": null,
            "items": [{
                "id": 1,
                "description": "Consultation",
                "quantity": 1,
                "unitPrice": total,
                "amount": total,
                "category": "CONSULTATION"
            }],
            "subtotal": total,
            "taxAmount": 0.0,
            "discountAmount": 0.0,
            "totalAmount": total,
            "paidAmount": total - balance,
            "balanceAmount": balance,
            "status": status,
            "dueDate": "2025-07-01",
            "notes": null,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn payment_response(id: i64, invoice_id: i64, amount: f64) -> serde_json::Value {
        json!({
            "id": id,
            "invoiceId": invoice_id,
            "amount": amount,
            "paymentMethod": "CASH",
            "transactionReference": null,
            "paymentDate": "2025-06-20",
            "notes": null
        })
    }

    pub fn medication_response(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "genericName": "Generic",
            "manufacturer": "Acme Pharma",
            "category": "ANALGESIC",
            "dosageForm": "TABLET",
            "strength": "500mg",
            "unitPrice": 4.5,
            "requiresPrescription": true,
            "description": null,
            "sideEffects": null,
            "contraindications": null,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn prescription_response(id: i64, patient_id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "prescriptionNumber": format!("RX-2025-{:04}", id),
            "patientId": patient_id,
            "patientName": "Alice Reed",
            "doctorId": 1,
            "doctorName": "Dr. Miriam Osei",
            "appointmentId": null,
            "items": [{
                "id": 1,
                "medicationId": 1,
                "medicationName": "Paracetamol",
                "dosage": "500mg",
                "frequency": "3x daily",
                "duration": "5 days",
                "quantity": 15,
                "instructions": null
            }],
            "status": status,
            "notes": null,
            "prescribedDate": "2025-06-01",
            "dispensedDate": null,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn inventory_response(
        id: i64,
        medication_name: &str,
        quantity: u32,
        reorder_level: u32,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "medicationId": id,
            "medicationName": medication_name,
            "batchNumber": format!("BATCH-{:03}", id),
            "quantity": quantity,
            "reorderLevel": reorder_level,
            "expiryDate": "2027-01-01",
            "location": "Shelf A1",
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00"
        })
    }

    pub fn auth_success(token: &str, username: &str) -> serde_json::Value {
        json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "token": token,
                "username": username,
                "role": null
            }
        })
    }

    pub fn auth_failure(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "message": message,
            "data": null
        })
    }
}
