use async_trait::async_trait;
use serde_json::Value;

use shared_screens::{split_first_word, DetailPhase, Screen, ScreenEvent};

use crate::models::Patient;
use crate::services::patient::PatientClient;

/// Full record view for one patient. A missing record sends the operator
/// back to the listing rather than rendering an empty screen.
pub struct PatientDetailScreen {
    client: PatientClient,
    id: i64,
    phase: DetailPhase<Patient>,
    history: Option<Vec<Value>>,
}

impl PatientDetailScreen {
    pub fn new(client: PatientClient, id: i64) -> Self {
        Self {
            client,
            id,
            phase: DetailPhase::Idle,
            history: None,
        }
    }

    async fn load(&mut self) -> ScreenEvent {
        self.phase = DetailPhase::Loading;
        match self.client.get(self.id).await {
            Ok(patient) => {
                self.phase = DetailPhase::Loaded(patient);
                ScreenEvent::None
            }
            Err(err) if err.is_not_found() => ScreenEvent::NavigateTo("/patients".to_string()),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => {
                self.phase = DetailPhase::Error { message: err.notice_text() };
                ScreenEvent::None
            }
        }
    }

    async fn load_history(&mut self) -> ScreenEvent {
        match self.client.medical_history(self.id).await {
            Ok(entries) => {
                self.history = Some(entries);
                ScreenEvent::None
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn render_patient(&self, patient: &Patient, out: &mut String) {
        out.push_str(&format!("  Name:          {}\n", patient.full_name()));
        out.push_str(&format!("  Email:         {}\n", patient.email));
        out.push_str(&format!("  Phone:         {}\n", patient.phone));
        out.push_str(&format!("  Date of birth: {}\n", patient.date_of_birth));
        out.push_str(&format!("  Gender:        {}\n", patient.gender));
        if let Some(blood_type) = &patient.blood_type {
            out.push_str(&format!("  Blood type:    {}\n", blood_type));
        }
        if let Some(allergies) = &patient.allergies {
            if !allergies.is_empty() {
                out.push_str(&format!("  Allergies:     {}\n", allergies.join(", ")));
            }
        }

        let address = &patient.address;
        out.push_str(&format!(
            "  Address:       {}, {}, {} {}, {}\n",
            address.street, address.city, address.state, address.zip_code, address.country
        ));

        let contact = &patient.emergency_contact;
        out.push_str(&format!(
            "  Emergency:     {} ({}), {}\n",
            contact.name, contact.relationship, contact.phone
        ));

        if let Some(insurance) = &patient.insurance_info {
            out.push_str(&format!(
                "  Insurance:     {} policy {}\n",
                insurance.provider, insurance.policy_number
            ));
        }
        if let Some(notes) = &patient.medical_notes {
            out.push_str(&format!("  Notes:         {}\n", notes));
        }
    }

    fn render_history(&self, out: &mut String) {
        let Some(entries) = &self.history else {
            return;
        };

        out.push_str("\nMedical history:\n");
        if entries.is_empty() {
            out.push_str("  (no entries)\n");
            return;
        }
        for entry in entries {
            out.push_str(&format!("  {}\n", history_line(entry)));
        }
    }
}

/// The history endpoint is schemaless; show the fields commonly present and
/// fall back to the raw object.
fn history_line(entry: &Value) -> String {
    let date = entry
        .get("date")
        .or_else(|| entry.get("visitDate"))
        .and_then(Value::as_str);
    let summary = entry
        .get("diagnosis")
        .or_else(|| entry.get("description"))
        .and_then(Value::as_str);

    match (date, summary) {
        (Some(date), Some(summary)) => format!("{}  {}", date, summary),
        (None, Some(summary)) => summary.to_string(),
        _ => entry.to_string(),
    }
}

#[async_trait]
impl Screen for PatientDetailScreen {
    fn title(&self) -> String {
        format!("Patient {}", self.id)
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.load().await
    }

    fn render(&self) -> String {
        let mut out = format!("Patient {}\n\n", self.id);

        match &self.phase {
            DetailPhase::Idle | DetailPhase::Loading => out.push_str("  Loading...\n"),
            DetailPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            DetailPhase::Loaded(patient) => {
                self.render_patient(patient, &mut out);
                self.render_history(&mut out);
            }
        }

        out.push_str("\nCommands: edit | history | back | reload\n");
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        let (verb, _) = split_first_word(input);
        match verb {
            "edit" => ScreenEvent::NavigateTo(format!("/patients/{}/edit", self.id)),
            "history" => self.load_history().await,
            "back" => ScreenEvent::NavigateTo("/patients".to_string()),
            "reload" => self.load().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error("Commands: edit | history | back | reload"),
        }
    }
}
