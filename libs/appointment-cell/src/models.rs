use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    pub fn parse(value: &str) -> Option<AppointmentStatus> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(AppointmentStatus::Pending),
            "CONFIRMED" => Some(AppointmentStatus::Confirmed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "NO_SHOW" | "NOSHOW" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::NoShow => "NO_SHOW",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    Emergency,
    RoutineCheckup,
    Specialist,
}

impl AppointmentType {
    pub fn parse(value: &str) -> Option<AppointmentType> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONSULTATION" => Some(AppointmentType::Consultation),
            "FOLLOW_UP" | "FOLLOWUP" => Some(AppointmentType::FollowUp),
            "EMERGENCY" => Some(AppointmentType::Emergency),
            "ROUTINE_CHECKUP" | "ROUTINE" => Some(AppointmentType::RoutineCheckup),
            "SPECIALIST" => Some(AppointmentType::Specialist),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentType::Consultation => "CONSULTATION",
            AppointmentType::FollowUp => "FOLLOW_UP",
            AppointmentType::Emergency => "EMERGENCY",
            AppointmentType::RoutineCheckup => "ROUTINE_CHECKUP",
            AppointmentType::Specialist => "SPECIALIST",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub department_id: i64,
    pub department_name: String,
    pub appointment_date: NaiveDate,
    /// Wall-clock time as the gateway sends it, `HH:MM`.
    pub appointment_time: String,
    pub duration: u32,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Appointment {
    pub fn can_confirm(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }

    pub fn can_complete(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }

    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub department_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub duration: u32,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Booking reference data. The gateway has no departments endpoint, so the
/// portal ships the same fixed catalog the booking form has always offered.
#[derive(Debug, Clone)]
pub struct Department {
    pub id: i64,
    pub name: &'static str,
}

impl Department {
    pub fn catalog() -> Vec<Department> {
        vec![
            Department { id: 1, name: "General Medicine" },
            Department { id: 2, name: "Cardiology" },
            Department { id: 3, name: "Orthopedics" },
            Department { id: 4, name: "Pediatrics" },
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Doctor {
    pub id: i64,
    pub name: &'static str,
    pub department_id: i64,
    pub specialization: &'static str,
}

impl Doctor {
    pub fn catalog() -> Vec<Doctor> {
        vec![
            Doctor { id: 1, name: "Dr. Smith", department_id: 1, specialization: "General Physician" },
            Doctor { id: 2, name: "Dr. Johnson", department_id: 2, specialization: "Cardiologist" },
            Doctor { id: 3, name: "Dr. Davis", department_id: 3, specialization: "Orthopedic Surgeon" },
            Doctor { id: 4, name: "Dr. Williams", department_id: 4, specialization: "Pediatrician" },
        ]
    }

    pub fn in_department(department_id: i64) -> Vec<Doctor> {
        Self::catalog()
            .into_iter()
            .filter(|d| d.department_id == department_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_deserializes_with_type_keyword_field() {
        let raw = r#"{
            "id": 3,
            "patientId": 1,
            "patientName": "Alice Reed",
            "doctorId": 2,
            "doctorName": "Dr. Johnson",
            "departmentId": 2,
            "departmentName": "Cardiology",
            "appointmentDate": "2025-06-15",
            "appointmentTime": "10:30",
            "duration": 30,
            "status": "NO_SHOW",
            "type": "FOLLOW_UP",
            "reason": "Checkup"
        }"#;

        let appointment: Appointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::NoShow);
        assert_eq!(appointment.appointment_type, AppointmentType::FollowUp);
        assert!(appointment.notes.is_none());
    }

    #[test]
    fn test_status_transitions_follow_the_lifecycle() {
        let raw = r#"{
            "id": 3, "patientId": 1, "patientName": "A", "doctorId": 1,
            "doctorName": "D", "departmentId": 1, "departmentName": "G",
            "appointmentDate": "2025-06-15", "appointmentTime": "10:30",
            "duration": 30, "status": "PENDING", "type": "CONSULTATION",
            "reason": "r"
        }"#;
        let mut appointment: Appointment = serde_json::from_str(raw).unwrap();

        assert!(appointment.can_confirm());
        assert!(!appointment.can_complete());
        assert!(appointment.can_cancel());

        appointment.status = AppointmentStatus::Confirmed;
        assert!(!appointment.can_confirm());
        assert!(appointment.can_complete());

        appointment.status = AppointmentStatus::Completed;
        assert!(!appointment.can_cancel());
    }

    #[test]
    fn test_status_parse_round_trips_display() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Completed,
            AppointmentStatus::NoShow,
        ] {
            assert_eq!(AppointmentStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("unknown"), None);
    }

    #[test]
    fn test_doctor_catalog_filters_by_department() {
        let cardiologists = Doctor::in_department(2);
        assert_eq!(cardiologists.len(), 1);
        assert_eq!(cardiologists[0].name, "Dr. Johnson");
        assert!(Doctor::in_department(9).is_empty());
    }
}
