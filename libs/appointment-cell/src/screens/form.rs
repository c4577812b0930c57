use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;

use shared_screens::{
    split_first_word, FormController, FormMode, Screen, ScreenEvent, SubmitBlocked,
};

use crate::models::{Appointment, AppointmentRequest, AppointmentType, Department, Doctor};
use crate::services::appointment::AppointmentClient;

/// Field values as typed by the operator. Everything is kept as text until
/// submission so a rejected submit loses nothing.
#[derive(Debug)]
struct AppointmentDraft {
    patient_id: String,
    department_id: String,
    doctor_id: String,
    appointment_date: String,
    appointment_time: String,
    duration: String,
    appointment_type: String,
    reason: String,
    notes: String,
}

impl Default for AppointmentDraft {
    fn default() -> Self {
        Self {
            patient_id: String::new(),
            department_id: String::new(),
            doctor_id: String::new(),
            appointment_date: String::new(),
            appointment_time: String::new(),
            duration: "30".to_string(),
            appointment_type: AppointmentType::Consultation.to_string(),
            reason: String::new(),
            notes: String::new(),
        }
    }
}

impl AppointmentDraft {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            "patientId" => &mut self.patient_id,
            "departmentId" => &mut self.department_id,
            "doctorId" => &mut self.doctor_id,
            "appointmentDate" => &mut self.appointment_date,
            "appointmentTime" => &mut self.appointment_time,
            "duration" => &mut self.duration,
            "type" => &mut self.appointment_type,
            "reason" => &mut self.reason,
            "notes" => &mut self.notes,
            _ => return None,
        };
        Some(field)
    }

    fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            patient_id: appointment.patient_id.to_string(),
            department_id: appointment.department_id.to_string(),
            doctor_id: appointment.doctor_id.to_string(),
            appointment_date: appointment.appointment_date.to_string(),
            appointment_time: appointment.appointment_time.clone(),
            duration: appointment.duration.to_string(),
            appointment_type: appointment.appointment_type.to_string(),
            reason: appointment.reason.clone(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    fn missing_fields(&self) -> Vec<String> {
        let required = [
            ("patientId", &self.patient_id),
            ("departmentId", &self.department_id),
            ("doctorId", &self.doctor_id),
            ("appointmentDate", &self.appointment_date),
            ("appointmentTime", &self.appointment_time),
            ("type", &self.appointment_type),
            ("reason", &self.reason),
        ];
        required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// The chosen department, when `departmentId` parses and names a real one.
    fn department(&self) -> Option<Department> {
        let id = self.department_id.trim().parse::<i64>().ok()?;
        Department::catalog().into_iter().find(|d| d.id == id)
    }

    fn doctor_id(&self) -> Option<i64> {
        self.doctor_id.trim().parse::<i64>().ok()
    }

    fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.appointment_date.trim(), "%Y-%m-%d").ok()
    }

    /// Turns the drafts into a request body, or a message naming the first
    /// field that does not parse.
    fn build_request(&self) -> Result<AppointmentRequest, String> {
        let patient_id = self
            .patient_id
            .trim()
            .parse::<i64>()
            .map_err(|_| "patientId must be a number".to_string())?;
        let department = self
            .department()
            .ok_or_else(|| "departmentId must name a listed department".to_string())?;
        let doctor_id = self
            .doctor_id()
            .ok_or_else(|| "doctorId must be a number".to_string())?;
        let doctor = Doctor::in_department(department.id)
            .into_iter()
            .find(|d| d.id == doctor_id)
            .ok_or_else(|| {
                format!("Doctor {} does not take appointments in {}", doctor_id, department.name)
            })?;
        let appointment_date = self
            .date()
            .ok_or_else(|| "appointmentDate must be YYYY-MM-DD".to_string())?;
        if !valid_time(self.appointment_time.trim()) {
            return Err("appointmentTime must be HH:MM".to_string());
        }
        let duration = self
            .duration
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| "duration must be a number of minutes".to_string())?;
        let appointment_type = AppointmentType::parse(&self.appointment_type).ok_or_else(|| {
            "type must be CONSULTATION, FOLLOW_UP, EMERGENCY, ROUTINE_CHECKUP or SPECIALIST"
                .to_string()
        })?;

        Ok(AppointmentRequest {
            patient_id,
            doctor_id: doctor.id,
            department_id: department.id,
            appointment_date,
            appointment_time: self.appointment_time.trim().to_string(),
            duration,
            appointment_type,
            reason: self.reason.trim().to_string(),
            notes: non_empty(&self.notes),
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

fn valid_time(time: &str) -> bool {
    let time_regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    time_regex.is_match(time)
}

/// Booking and reschedule form. Doctors are offered per department, and the
/// gateway can be asked which slots are still free before submitting.
pub struct AppointmentFormScreen {
    client: AppointmentClient,
    form: FormController,
    draft: AppointmentDraft,
    slots: Option<Vec<String>>,
}

impl AppointmentFormScreen {
    pub fn new(client: AppointmentClient, mode: FormMode) -> Self {
        Self {
            client,
            form: FormController::new(mode),
            draft: AppointmentDraft::default(),
            slots: None,
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
            FormMode::Create => (self.client.create(&request).await, "booked"),
            FormMode::Edit(id) => (self.client.update(id, &request).await, "updated"),
        };
        self.form.finish_submit();

        match result {
            Ok(_) => {
                ScreenEvent::saved(format!("Appointment {} successfully", verb), "/appointments")
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // The drafts stay as typed; the operator corrects and resubmits.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    /// Asks the gateway which times are still open for the drafted doctor
    /// and date.
    async fn load_slots(&mut self) -> ScreenEvent {
        let (Some(doctor_id), Some(date)) = (self.draft.doctor_id(), self.draft.date()) else {
            return ScreenEvent::notify_error("Set doctorId and appointmentDate first");
        };

        match self.client.available_slots(doctor_id, date).await {
            Ok(slots) => {
                self.slots = Some(slots);
                ScreenEvent::None
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn back_path(&self) -> String {
        match self.form.mode() {
            FormMode::Create => "/appointments".to_string(),
            FormMode::Edit(id) => format!("/appointments/{}", id),
        }
    }

    fn render_catalogs(&self, out: &mut String) {
        let departments: Vec<String> = Department::catalog()
            .iter()
            .map(|d| format!("{} {}", d.id, d.name))
            .collect();
        out.push_str(&format!("\n  Departments: {}\n", departments.join(" | ")));

        // Narrow the doctor list once a department is chosen.
        let doctors = match self.draft.department() {
            Some(department) => Doctor::in_department(department.id),
            None => Doctor::catalog(),
        };
        let doctors: Vec<String> = doctors
            .iter()
            .map(|d| format!("{} {} ({})", d.id, d.name, d.specialization))
            .collect();
        out.push_str(&format!("  Doctors:     {}\n", doctors.join(" | ")));

        if let Some(slots) = &self.slots {
            if slots.is_empty() {
                out.push_str("  Free slots:  (none)\n");
            } else {
                out.push_str(&format!("  Free slots:  {}\n", slots.join(" ")));
            }
        }
    }
}

#[async_trait]
impl Screen for AppointmentFormScreen {
    fn title(&self) -> String {
        match self.form.mode() {
            FormMode::Create => "New appointment".to_string(),
            FormMode::Edit(id) => format!("Edit appointment {}", id),
        }
    }

    async fn enter(&mut self) -> ScreenEvent {
        let FormMode::Edit(id) = self.form.mode() else {
            return ScreenEvent::None;
        };

        match self.client.get(id).await {
            Ok(appointment) => {
                self.draft = AppointmentDraft::from_appointment(&appointment);
                ScreenEvent::None
            }
            Err(err) if err.is_not_found() => ScreenEvent::NavigateTo("/appointments".to_string()),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n\n", self.title());
        let draft = &self.draft;

        out.push_str(&format!("  patientId:       {}\n", draft.patient_id));
        out.push_str(&format!("  departmentId:    {}\n", draft.department_id));
        out.push_str(&format!("  doctorId:        {}\n", draft.doctor_id));
        out.push_str(&format!("  appointmentDate: {}\n", draft.appointment_date));
        out.push_str(&format!("  appointmentTime: {}\n", draft.appointment_time));
        out.push_str(&format!("  duration:        {}\n", draft.duration));
        out.push_str(&format!("  type:            {}\n", draft.appointment_type));
        out.push_str(&format!("  reason:          {}\n", draft.reason));
        out.push_str(&format!("  notes:           {}\n", draft.notes));

        self.render_catalogs(&mut out);

        if self.form.in_flight() {
            out.push_str("\n  Submitting...\n");
        }
        out.push_str("\nCommands: set <field> <value> | slots | submit | back\n");
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
            "slots" => self.load_slots().await,
            "submit" => self.submit().await,
            "back" => ScreenEvent::NavigateTo(self.back_path()),
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error("Commands: set <field> <value> | slots | submit | back"),
        }
    }
}
