use async_trait::async_trait;

use shared_screens::{
    pager_line, render_table, split_first_word, Confirm, ConfirmGate, ListController, ListPhase,
    Screen, ScreenEvent,
};

use crate::models::Prescription;
use crate::services::pharmacy::PharmacyClient;

/// Paginated prescription listing with a guarded dispense row action.
/// Dispensing is one-way, so it always asks first.
pub struct PrescriptionListScreen {
    client: PharmacyClient,
    list: ListController<Prescription, ()>,
    confirm: ConfirmGate<i64>,
}

impl PrescriptionListScreen {
    pub fn new(client: PharmacyClient, page_size: u32) -> Self {
        Self {
            client,
            list: ListController::new((), page_size),
            confirm: ConfirmGate::new(),
        }
    }

    async fn reload(&mut self) -> ScreenEvent {
        let ticket = self.list.begin_reload();
        let result = self.client.prescriptions(ticket.page).await;
        let expired = matches!(&result, Err(err) if err.is_unauthenticated());
        self.list.apply(ticket, result);
        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    /// A visible non-pending row is refused outright; otherwise the gate
    /// opens and the gateway has the final say.
    fn request_dispense(&mut self, id: i64) -> ScreenEvent {
        if let Some(row) = self.list.rows().iter().find(|p| p.id == id) {
            if !row.can_dispense() {
                return ScreenEvent::notify_error(format!(
                    "Prescription {} is {} and cannot be dispensed",
                    id, row.status
                ));
            }
        }
        self.confirm.request(id);
        ScreenEvent::None
    }

    async fn dispense(&mut self, id: i64) -> ScreenEvent {
        match self.client.dispense(id).await {
            Ok(_) => {
                // Refresh the page the operator is looking at.
                let ticket = self.list.begin_reload();
                let result = self.client.prescriptions(ticket.page).await;
                self.list.apply(ticket, result);
                ScreenEvent::notify_success(format!("Prescription {} dispensed", id))
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
            "dispense" => match rest.parse::<i64>() {
                Ok(id) => self.request_dispense(id),
                Err(_) => ScreenEvent::notify_error("Usage: dispense <id>"),
            },
            "medications" => ScreenEvent::NavigateTo("/pharmacy/medications".to_string()),
            "inventory" => ScreenEvent::NavigateTo("/pharmacy/inventory".to_string()),
            "reload" => self.reload().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | dispense <id> | medications | inventory | reload",
            ),
        }
    }
}

#[async_trait]
impl Screen for PrescriptionListScreen {
    fn title(&self) -> String {
        "Prescriptions".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.reload().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Prescriptions\n\n");

        match self.list.phase() {
            ListPhase::Idle | ListPhase::Loading => out.push_str("  Loading...\n"),
            ListPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            ListPhase::Loaded(loaded) => {
                let rows: Vec<Vec<String>> = loaded
                    .rows
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.prescription_number.clone(),
                            p.patient_name.clone(),
                            p.doctor_name.clone(),
                            p.prescribed_date.to_string(),
                            format!("{} medication(s)", p.items.len()),
                            p.status.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["ID", "RX #", "PATIENT", "PRESCRIBED BY", "DATE", "ITEMS", "STATUS"],
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

        if let Some(id) = self.confirm.pending() {
            out.push_str(&format!("\n  Dispense prescription {}? (y/n)\n", id));
        }

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | dispense <id> | medications | inventory | reload\n",
        );
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        if self.confirm.is_pending() {
            return match Confirm::parse(input) {
                Some(answer) => match self.confirm.resolve(answer) {
                    Some(id) => self.dispense(id).await,
                    None => ScreenEvent::None,
                },
                None => ScreenEvent::notify_error("Please answer y or n"),
            };
        }
        self.handle_command(input).await
    }
}
