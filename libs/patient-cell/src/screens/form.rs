use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;

use shared_screens::{
    split_first_word, FormController, FormMode, Screen, ScreenEvent, SubmitBlocked,
};

use crate::models::{Address, EmergencyContact, Gender, InsuranceInfo, Patient, PatientRequest};
use crate::services::patient::PatientClient;

/// Field values as typed by the operator. Everything is kept as text until
/// submission so a rejected submit loses nothing.
#[derive(Debug, Default)]
struct PatientDraft {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: String,
    gender: String,
    blood_type: String,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    contact_name: String,
    contact_relationship: String,
    contact_phone: String,
    allergies: String,
    notes: String,
    insurance_provider: String,
    insurance_policy: String,
}

impl PatientDraft {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "dateOfBirth" => &mut self.date_of_birth,
            "gender" => &mut self.gender,
            "bloodType" => &mut self.blood_type,
            "street" => &mut self.street,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "zipCode" => &mut self.zip_code,
            "country" => &mut self.country,
            "contactName" => &mut self.contact_name,
            "contactRelationship" => &mut self.contact_relationship,
            "contactPhone" => &mut self.contact_phone,
            "allergies" => &mut self.allergies,
            "notes" => &mut self.notes,
            "insuranceProvider" => &mut self.insurance_provider,
            "insurancePolicy" => &mut self.insurance_policy,
            _ => return None,
        };
        Some(field)
    }

    fn from_patient(patient: &Patient) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            date_of_birth: patient.date_of_birth.to_string(),
            gender: patient.gender.to_string(),
            blood_type: patient.blood_type.clone().unwrap_or_default(),
            street: patient.address.street.clone(),
            city: patient.address.city.clone(),
            state: patient.address.state.clone(),
            zip_code: patient.address.zip_code.clone(),
            country: patient.address.country.clone(),
            contact_name: patient.emergency_contact.name.clone(),
            contact_relationship: patient.emergency_contact.relationship.clone(),
            contact_phone: patient.emergency_contact.phone.clone(),
            allergies: patient
                .allergies
                .as_deref()
                .map(|list| list.join(", "))
                .unwrap_or_default(),
            notes: patient.medical_notes.clone().unwrap_or_default(),
            insurance_provider: patient
                .insurance_info
                .as_ref()
                .map(|i| i.provider.clone())
                .unwrap_or_default(),
            insurance_policy: patient
                .insurance_info
                .as_ref()
                .map(|i| i.policy_number.clone())
                .unwrap_or_default(),
        }
    }

    fn missing_fields(&self) -> Vec<String> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("dateOfBirth", &self.date_of_birth),
            ("gender", &self.gender),
        ];
        required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Turns the drafts into a request body, or a message naming the first
    /// field that does not parse.
    fn build_request(&self) -> Result<PatientRequest, String> {
        if !valid_email(self.email.trim()) {
            return Err("email must look like name@example.com".to_string());
        }
        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| "dateOfBirth must be YYYY-MM-DD".to_string())?;
        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| "gender must be MALE, FEMALE or OTHER".to_string())?;

        let address = if self.street.trim().is_empty() && self.city.trim().is_empty() {
            None
        } else {
            Some(Address {
                street: self.street.trim().to_string(),
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
                zip_code: self.zip_code.trim().to_string(),
                country: self.country.trim().to_string(),
            })
        };

        let emergency_contact = if self.contact_name.trim().is_empty() {
            None
        } else {
            Some(EmergencyContact {
                name: self.contact_name.trim().to_string(),
                relationship: self.contact_relationship.trim().to_string(),
                phone: self.contact_phone.trim().to_string(),
            })
        };

        let insurance_info = if self.insurance_provider.trim().is_empty() {
            None
        } else {
            Some(InsuranceInfo {
                provider: self.insurance_provider.trim().to_string(),
                policy_number: self.insurance_policy.trim().to_string(),
                group_number: None,
                expiry_date: None,
            })
        };

        let allergies: Vec<String> = self
            .allergies
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(PatientRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date_of_birth,
            gender,
            address,
            emergency_contact,
            blood_type: non_empty(&self.blood_type),
            allergies: if allergies.is_empty() { None } else { Some(allergies) },
            medical_notes: non_empty(&self.notes),
            insurance_info,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn valid_email(email: &str) -> bool {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    email_regex.is_match(email)
}

/// Create and edit form for patient records.
pub struct PatientFormScreen {
    client: PatientClient,
    form: FormController,
    draft: PatientDraft,
}

impl PatientFormScreen {
    pub fn new(client: PatientClient, mode: FormMode) -> Self {
        Self {
            client,
            form: FormController::new(mode),
            draft: PatientDraft::default(),
        }
    }

    async fn submit(&mut self) -> ScreenEvent {
        match self.form.begin_submit(self.draft.missing_fields()) {
            Err(SubmitBlocked::MissingFields(fields)) => {
                return ScreenEvent::notify_error(format!("Required: {}", fields.join(", ")));
            }
            Err(SubmitBlocked::InFlight) => return ScreenEvent::None,
            Ok(()) => {}
        }

        let request = match self.draft.build_request() {
            Ok(request) => request,
            Err(message) => {
                self.form.finish_submit();
                return ScreenEvent::notify_error(message);
            }
        };

        let (result, verb) = match self.form.mode() {
            FormMode::Create => (self.client.create(&request).await, "created"),
            FormMode::Edit(id) => (self.client.update(id, &request).await, "updated"),
        };
        self.form.finish_submit();

        match result {
            Ok(_) => ScreenEvent::saved(format!("Patient {} successfully", verb), "/patients"),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // The drafts stay as typed; the operator corrects and resubmits.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn back_path(&self) -> String {
        match self.form.mode() {
            FormMode::Create => "/patients".to_string(),
            FormMode::Edit(id) => format!("/patients/{}", id),
        }
    }
}

#[async_trait]
impl Screen for PatientFormScreen {
    fn title(&self) -> String {
        match self.form.mode() {
            FormMode::Create => "New patient".to_string(),
            FormMode::Edit(id) => format!("Edit patient {}", id),
        }
    }

    async fn enter(&mut self) -> ScreenEvent {
        let FormMode::Edit(id) = self.form.mode() else {
            return ScreenEvent::None;
        };

        match self.client.get(id).await {
            Ok(patient) => {
                self.draft = PatientDraft::from_patient(&patient);
                ScreenEvent::None
            }
            Err(err) if err.is_not_found() => ScreenEvent::NavigateTo("/patients".to_string()),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n\n", self.title());
        let draft = &self.draft;

        out.push_str(&format!("  firstName:           {}\n", draft.first_name));
        out.push_str(&format!("  lastName:            {}\n", draft.last_name));
        out.push_str(&format!("  email:               {}\n", draft.email));
        out.push_str(&format!("  phone:               {}\n", draft.phone));
        out.push_str(&format!("  dateOfBirth:         {}\n", draft.date_of_birth));
        out.push_str(&format!("  gender:              {}\n", draft.gender));
        out.push_str(&format!("  bloodType:           {}\n", draft.blood_type));
        out.push_str(&format!("  street:              {}\n", draft.street));
        out.push_str(&format!("  city:                {}\n", draft.city));
        out.push_str(&format!("  state:               {}\n", draft.state));
        out.push_str(&format!("  zipCode:             {}\n", draft.zip_code));
        out.push_str(&format!("  country:             {}\n", draft.country));
        out.push_str(&format!("  contactName:         {}\n", draft.contact_name));
        out.push_str(&format!("  contactRelationship: {}\n", draft.contact_relationship));
        out.push_str(&format!("  contactPhone:        {}\n", draft.contact_phone));
        out.push_str(&format!("  allergies:           {}\n", draft.allergies));
        out.push_str(&format!("  notes:               {}\n", draft.notes));
        out.push_str(&format!("  insuranceProvider:   {}\n", draft.insurance_provider));
        out.push_str(&format!("  insurancePolicy:     {}\n", draft.insurance_policy));

        if self.form.in_flight() {
            out.push_str("\n  Submitting...\n");
        }
        out.push_str("\nCommands: set <field> <value> | submit | back\n");
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        let (verb, rest) = split_first_word(input);
        match verb {
            "set" => {
                let (field, value) = split_first_word(rest);
                match self.draft.field_mut(field) {
                    Some(slot) => {
                        *slot = value.to_string();
                        ScreenEvent::None
                    }
                    None => ScreenEvent::notify_error(format!("Unknown field: {}", field)),
                }
            }
            "submit" => self.submit().await,
            "back" => ScreenEvent::NavigateTo(self.back_path()),
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error("Commands: set <field> <value> | submit | back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> PatientDraft {
        let mut draft = PatientDraft::default();
        draft.first_name = "Alice".to_string();
        draft.last_name = "Reed".to_string();
        draft.email = "alice@example.com".to_string();
        draft.phone = "555-0100".to_string();
        draft.date_of_birth = "1985-04-12".to_string();
        draft.gender = "FEMALE".to_string();
        draft
    }

    #[test]
    fn missing_fields_name_every_empty_required_field() {
        let draft = PatientDraft::default();
        let missing = draft.missing_fields();
        assert_eq!(
            missing,
            vec!["firstName", "lastName", "email", "phone", "dateOfBirth", "gender"]
        );
        assert!(filled_draft().missing_fields().is_empty());
    }

    #[test]
    fn build_request_rejects_bad_formats() {
        let mut draft = filled_draft();
        draft.email = "not-an-email".to_string();
        assert!(draft.build_request().unwrap_err().contains("email"));

        let mut draft = filled_draft();
        draft.date_of_birth = "12/04/1985".to_string();
        assert!(draft.build_request().unwrap_err().contains("dateOfBirth"));

        let mut draft = filled_draft();
        draft.gender = "X".to_string();
        assert!(draft.build_request().unwrap_err().contains("gender"));
    }

    #[test]
    fn build_request_splits_allergies_and_skips_blank_groups() {
        let mut draft = filled_draft();
        draft.allergies = "Penicillin, Latex , ".to_string();

        let request = draft.build_request().unwrap();
        assert_eq!(
            request.allergies,
            Some(vec!["Penicillin".to_string(), "Latex".to_string()])
        );
        assert!(request.address.is_none());
        assert!(request.emergency_contact.is_none());
        assert!(request.insurance_info.is_none());
    }

    #[test]
    fn drafts_prefill_from_an_existing_record() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": 7,
            "firstName": "Alice",
            "lastName": "Reed",
            "email": "alice@example.com",
            "phone": "555-0100",
            "dateOfBirth": "1985-04-12",
            "gender": "FEMALE",
            "address": {
                "street": "1 Main St", "city": "Springfield", "state": "IL",
                "zipCode": "62701", "country": "USA"
            },
            "emergencyContact": {
                "name": "Sam Reed", "relationship": "Spouse", "phone": "555-0101"
            },
            "allergies": ["Penicillin", "Latex"]
        }))
        .unwrap();

        let draft = PatientDraft::from_patient(&patient);
        assert_eq!(draft.date_of_birth, "1985-04-12");
        assert_eq!(draft.gender, "FEMALE");
        assert_eq!(draft.allergies, "Penicillin, Latex");
        assert_eq!(draft.city, "Springfield");
    }

    #[test]
    fn email_format_check() {
        assert!(valid_email("a.b@clinic.example.org"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("name@nodot"));
    }
}
