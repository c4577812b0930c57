use async_trait::async_trait;

use shared_models::PortalError;
use shared_screens::{split_first_word, Confirm, ConfirmGate, DetailPhase, Screen, ScreenEvent};

use crate::models::Appointment;
use crate::services::appointment::AppointmentClient;

/// Full record view for one appointment with its lifecycle actions. Status
/// changes update the record in place; only cancel asks for confirmation.
pub struct AppointmentDetailScreen {
    client: AppointmentClient,
    id: i64,
    phase: DetailPhase<Appointment>,
    confirm: ConfirmGate<()>,
}

impl AppointmentDetailScreen {
    pub fn new(client: AppointmentClient, id: i64) -> Self {
        Self {
            client,
            id,
            phase: DetailPhase::Idle,
            confirm: ConfirmGate::new(),
        }
    }

    async fn load(&mut self) -> ScreenEvent {
        self.phase = DetailPhase::Loading;
        match self.client.get(self.id).await {
            Ok(appointment) => {
                self.phase = DetailPhase::Loaded(appointment);
                ScreenEvent::None
            }
            Err(err) if err.is_not_found() => ScreenEvent::NavigateTo("/appointments".to_string()),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => {
                self.phase = DetailPhase::Error { message: err.notice_text() };
                ScreenEvent::None
            }
        }
    }

    fn apply_update(
        &mut self,
        result: Result<Appointment, PortalError>,
        notice: &str,
    ) -> ScreenEvent {
        match result {
            Ok(updated) => {
                self.phase = DetailPhase::Loaded(updated);
                ScreenEvent::notify_success(notice)
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // A failed action leaves the record exactly as it was.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    async fn confirm_appointment(&mut self) -> ScreenEvent {
        match self.phase.entity() {
            Some(a) if a.can_confirm() => {
                let result = self.client.confirm(self.id).await;
                self.apply_update(result, "Appointment confirmed")
            }
            Some(_) => ScreenEvent::notify_error("Only PENDING appointments can be confirmed"),
            None => ScreenEvent::None,
        }
    }

    async fn complete_appointment(&mut self) -> ScreenEvent {
        match self.phase.entity() {
            Some(a) if a.can_complete() => {
                let result = self.client.complete(self.id).await;
                self.apply_update(result, "Appointment completed")
            }
            Some(_) => ScreenEvent::notify_error("Only CONFIRMED appointments can be completed"),
            None => ScreenEvent::None,
        }
    }

    fn request_cancel(&mut self) -> ScreenEvent {
        match self.phase.entity() {
            Some(a) if a.can_cancel() => {
                self.confirm.request(());
                ScreenEvent::None
            }
            Some(a) => ScreenEvent::notify_error(format!(
                "Appointment is {} and cannot be cancelled",
                a.status
            )),
            None => ScreenEvent::None,
        }
    }

    async fn cancel_appointment(&mut self) -> ScreenEvent {
        let result = self.client.cancel(self.id).await;
        self.apply_update(result, "Appointment cancelled")
    }

    fn render_appointment(&self, appointment: &Appointment, out: &mut String) {
        out.push_str(&format!("  Patient:    {}\n", appointment.patient_name));
        out.push_str(&format!("  Doctor:     {}\n", appointment.doctor_name));
        out.push_str(&format!("  Department: {}\n", appointment.department_name));
        out.push_str(&format!(
            "  When:       {} at {} ({} min)\n",
            appointment.appointment_date, appointment.appointment_time, appointment.duration
        ));
        out.push_str(&format!("  Type:       {}\n", appointment.appointment_type));
        out.push_str(&format!("  Status:     {}\n", appointment.status));
        out.push_str(&format!("  Reason:     {}\n", appointment.reason));
        if let Some(notes) = &appointment.notes {
            out.push_str(&format!("  Notes:      {}\n", notes));
        }
    }

    fn actions_line(&self) -> String {
        let mut actions: Vec<&str> = Vec::new();
        if let Some(appointment) = self.phase.entity() {
            if appointment.can_confirm() {
                actions.push("confirm");
            }
            if appointment.can_complete() {
                actions.push("complete");
            }
            if appointment.can_cancel() {
                actions.push("cancel");
            }
            actions.push("edit");
        }
        actions.extend(["back", "reload"]);
        format!("\nCommands: {}\n", actions.join(" | "))
    }
}

#[async_trait]
impl Screen for AppointmentDetailScreen {
    fn title(&self) -> String {
        format!("Appointment {}", self.id)
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.load().await
    }

    fn render(&self) -> String {
        let mut out = format!("Appointment {}\n\n", self.id);

        match &self.phase {
            DetailPhase::Idle | DetailPhase::Loading => out.push_str("  Loading...\n"),
            DetailPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            DetailPhase::Loaded(appointment) => self.render_appointment(appointment, &mut out),
        }

        if self.confirm.is_pending() {
            out.push_str(&format!("\n  Cancel appointment {}? (y/n)\n", self.id));
        }

        out.push_str(&self.actions_line());
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        if self.confirm.is_pending() {
            return match Confirm::parse(input) {
                Some(answer) => match self.confirm.resolve(answer) {
                    Some(()) => self.cancel_appointment().await,
                    None => ScreenEvent::None,
                },
                None => ScreenEvent::notify_error("Please answer y or n"),
            };
        }

        let (verb, _) = split_first_word(input);
        match verb {
            "confirm" => self.confirm_appointment().await,
            "complete" => self.complete_appointment().await,
            "cancel" => self.request_cancel(),
            "edit" => ScreenEvent::NavigateTo(format!("/appointments/{}/edit", self.id)),
            "back" => ScreenEvent::NavigateTo("/appointments".to_string()),
            "reload" => self.load().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error("Commands: confirm | complete | cancel | edit | back | reload"),
        }
    }
}
