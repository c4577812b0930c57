use async_trait::async_trait;

use shared_screens::{
    pager_line, render_table, split_first_word, Confirm, ConfirmGate, ListController, ListPhase,
    Screen, ScreenEvent,
};

use crate::models::{Appointment, AppointmentStatus};
use crate::services::appointment::AppointmentClient;

#[derive(Debug, Clone, Copy)]
enum PendingAction {
    Cancel(i64),
}

/// Paginated appointment schedule with a server-side status filter and a
/// guarded cancel row action.
pub struct AppointmentListScreen {
    client: AppointmentClient,
    list: ListController<Appointment, Option<AppointmentStatus>>,
    confirm: ConfirmGate<PendingAction>,
}

impl AppointmentListScreen {
    pub fn new(client: AppointmentClient, page_size: u32) -> Self {
        Self {
            client,
            list: ListController::new(None, page_size),
            confirm: ConfirmGate::new(),
        }
    }

    async fn reload(&mut self) -> ScreenEvent {
        let ticket = self.list.begin_reload();
        let result = self.client.list(ticket.page, ticket.filter).await;
        let expired = matches!(&result, Err(err) if err.is_unauthenticated());
        self.list.apply(ticket, result);
        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    /// The cancel action only exists for rows still in play. When the row is
    /// on screen and already terminal, refuse without prompting.
    fn request_cancel(&mut self, id: i64) -> ScreenEvent {
        let on_screen = self.list.rows().iter().find(|a| a.id == id);
        if let Some(appointment) = on_screen {
            if !appointment.can_cancel() {
                return ScreenEvent::notify_error(format!(
                    "Appointment {} is {} and cannot be cancelled",
                    id, appointment.status
                ));
            }
        }
        self.confirm.request(PendingAction::Cancel(id));
        ScreenEvent::None
    }

    async fn cancel(&mut self, id: i64) -> ScreenEvent {
        match self.client.cancel(id).await {
            Ok(_) => {
                let ticket = self.list.begin_reload();
                let result = self.client.list(ticket.page, ticket.filter).await;
                self.list.apply(ticket, result);
                ScreenEvent::notify_success(format!("Appointment {} cancelled", id))
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // A failed action leaves the listing exactly as it was.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    async fn handle_command(&mut self, input: &str) -> ScreenEvent {
        let (verb, rest) = split_first_word(input);
        match verb {
            "next" => {
                if self.list.next_page() {
                    self.reload().await
                } else {
                    ScreenEvent::notify_error("Already on the last page")
                }
            }
            "prev" => {
                if self.list.prev_page() {
                    self.reload().await
                } else {
                    ScreenEvent::notify_error("Already on the first page")
                }
            }
            "page" => match rest.parse::<u32>() {
                Ok(n) if n >= 1 => {
                    if self.list.set_page(n - 1) {
                        self.reload().await
                    } else {
                        ScreenEvent::notify_error("No such page")
                    }
                }
                _ => ScreenEvent::notify_error("Usage: page <number>"),
            },
            "size" => match rest.parse::<u32>() {
                Ok(n) if n >= 1 => {
                    self.list.set_page_size(n);
                    self.reload().await
                }
                _ => ScreenEvent::notify_error("Usage: size <number>"),
            },
            "status" => match AppointmentStatus::parse(rest) {
                Some(status) => {
                    self.list.set_filter(Some(status));
                    self.reload().await
                }
                None => ScreenEvent::notify_error(
                    "Usage: status <PENDING|CONFIRMED|COMPLETED|CANCELLED|NO_SHOW>",
                ),
            },
            "clear" => {
                self.list.set_filter(None);
                self.reload().await
            }
            "reload" => self.reload().await,
            "new" => ScreenEvent::NavigateTo("/appointments/new".to_string()),
            "open" => match rest.parse::<i64>() {
                Ok(id) => ScreenEvent::NavigateTo(format!("/appointments/{}", id)),
                Err(_) => ScreenEvent::notify_error("Usage: open <id>"),
            },
            "edit" => match rest.parse::<i64>() {
                Ok(id) => ScreenEvent::NavigateTo(format!("/appointments/{}/edit", id)),
                Err(_) => ScreenEvent::notify_error("Usage: edit <id>"),
            },
            "cancel" => match rest.parse::<i64>() {
                Ok(id) => self.request_cancel(id),
                Err(_) => ScreenEvent::notify_error("Usage: cancel <id>"),
            },
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | status <s> | clear | open <id> | new | edit <id> | cancel <id> | reload",
            ),
        }
    }
}

#[async_trait]
impl Screen for AppointmentListScreen {
    fn title(&self) -> String {
        "Appointments".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.reload().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Appointments\n\n");

        match self.list.phase() {
            ListPhase::Idle | ListPhase::Loading => out.push_str("  Loading...\n"),
            ListPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            ListPhase::Loaded(loaded) => {
                let rows: Vec<Vec<String>> = loaded
                    .rows
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.appointment_date.to_string(),
                            a.appointment_time.clone(),
                            a.patient_name.clone(),
                            a.doctor_name.clone(),
                            a.department_name.clone(),
                            a.appointment_type.to_string(),
                            a.status.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["ID", "DATE", "TIME", "PATIENT", "DOCTOR", "DEPARTMENT", "TYPE", "STATUS"],
                    &rows,
                ));
                out.push_str(&pager_line(
                    self.list.page().number,
                    loaded.total_pages,
                    loaded.total_elements,
                ));
                out.push('\n');
            }
        }

        if let Some(status) = self.list.filter() {
            out.push_str(&format!("\n  Status filter: {}\n", status));
        }
        if let Some(PendingAction::Cancel(id)) = self.confirm.pending() {
            out.push_str(&format!("\n  Cancel appointment {}? (y/n)\n", id));
        }

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | status <s> | clear | open <id> | new | edit <id> | cancel <id>\n",
        );
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        if self.confirm.is_pending() {
            return match Confirm::parse(input) {
                Some(answer) => match self.confirm.resolve(answer) {
                    Some(PendingAction::Cancel(id)) => self.cancel(id).await,
                    None => ScreenEvent::None,
                },
                None => ScreenEvent::notify_error("Please answer y or n"),
            };
        }
        self.handle_command(input).await
    }
}
