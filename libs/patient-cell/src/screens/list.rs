use async_trait::async_trait;

use shared_models::{Page, PortalError};
use shared_screens::{
    pager_line, render_table, split_first_word, Confirm, ConfirmGate, ListController, ListPhase,
    ReloadTicket, Screen, ScreenEvent,
};

use crate::models::{Patient, PatientSearchCriteria};
use crate::services::patient::PatientClient;

#[derive(Debug, Clone, Copy)]
enum PendingAction {
    Delete(i64),
}

/// Paginated patient listing with server-side search and a guarded delete
/// row action.
pub struct PatientListScreen {
    client: PatientClient,
    list: ListController<Patient, PatientSearchCriteria>,
    confirm: ConfirmGate<PendingAction>,
}

impl PatientListScreen {
    pub fn new(client: PatientClient, page_size: u32) -> Self {
        Self {
            client,
            list: ListController::new(PatientSearchCriteria::default(), page_size),
            confirm: ConfirmGate::new(),
        }
    }

    /// An empty filter reads the plain collection; anything else goes to the
    /// search endpoint with the same paging.
    async fn fetch(
        &self,
        ticket: &ReloadTicket<PatientSearchCriteria>,
    ) -> Result<Page<Patient>, PortalError> {
        if ticket.filter.is_empty() {
            self.client.list(ticket.page).await
        } else {
            self.client.search(&ticket.filter, ticket.page).await
        }
    }

    async fn reload(&mut self) -> ScreenEvent {
        let ticket = self.list.begin_reload();
        let result = self.fetch(&ticket).await;
        let expired = matches!(&result, Err(err) if err.is_unauthenticated());
        self.list.apply(ticket, result);
        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    async fn delete(&mut self, id: i64) -> ScreenEvent {
        match self.client.delete(id).await {
            Ok(()) => {
                // Refresh the page the operator is looking at.
                let ticket = self.list.begin_reload();
                let result = self.fetch(&ticket).await;
                self.list.apply(ticket, result);
                ScreenEvent::notify_success(format!("Patient {} deleted", id))
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
            "search" => {
                if rest.is_empty() {
                    ScreenEvent::notify_error("Usage: search <name>")
                } else {
                    self.list.set_filter(PatientSearchCriteria::by_name(rest));
                    self.reload().await
                }
            }
            "clear" => {
                self.list.set_filter(PatientSearchCriteria::default());
                self.reload().await
            }
            "reload" => self.reload().await,
            "new" => ScreenEvent::NavigateTo("/patients/new".to_string()),
            "open" => match rest.parse::<i64>() {
                Ok(id) => ScreenEvent::NavigateTo(format!("/patients/{}", id)),
                Err(_) => ScreenEvent::notify_error("Usage: open <id>"),
            },
            "edit" => match rest.parse::<i64>() {
                Ok(id) => ScreenEvent::NavigateTo(format!("/patients/{}/edit", id)),
                Err(_) => ScreenEvent::notify_error("Usage: edit <id>"),
            },
            "delete" => match rest.parse::<i64>() {
                Ok(id) => {
                    self.confirm.request(PendingAction::Delete(id));
                    ScreenEvent::None
                }
                Err(_) => ScreenEvent::notify_error("Usage: delete <id>"),
            },
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | search <name> | clear | open <id> | new | edit <id> | delete <id> | reload",
            ),
        }
    }
}

#[async_trait]
impl Screen for PatientListScreen {
    fn title(&self) -> String {
        "Patients".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.reload().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Patients\n\n");

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
                            p.full_name(),
                            p.email.clone(),
                            p.phone.clone(),
                            p.date_of_birth.to_string(),
                            p.gender.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["ID", "NAME", "EMAIL", "PHONE", "DATE OF BIRTH", "GENDER"],
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

        if let Some(term) = &self.list.filter().first_name {
            out.push_str(&format!("\n  Search: {}\n", term));
        }
        if let Some(PendingAction::Delete(id)) = self.confirm.pending() {
            out.push_str(&format!("\n  Delete patient {}? (y/n)\n", id));
        }

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | search <name> | clear | open <id> | new | edit <id> | delete <id>\n",
        );
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        if self.confirm.is_pending() {
            return match Confirm::parse(input) {
                Some(answer) => match self.confirm.resolve(answer) {
                    Some(PendingAction::Delete(id)) => self.delete(id).await,
                    None => ScreenEvent::None,
                },
                None => ScreenEvent::notify_error("Please answer y or n"),
            };
        }
        self.handle_command(input).await
    }
}
