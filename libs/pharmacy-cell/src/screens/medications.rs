use async_trait::async_trait;

use shared_models::{Page, PortalError};
use shared_screens::{
    pager_line, render_table, split_first_word, ListController, ListPhase, ReloadTicket, Screen,
    ScreenEvent,
};

use crate::models::Medication;
use crate::services::pharmacy::PharmacyClient;

/// Paginated medication catalogue with a name search. The filter is the
/// search text; an empty filter reads the plain listing.
pub struct MedicationListScreen {
    client: PharmacyClient,
    list: ListController<Medication, String>,
}

impl MedicationListScreen {
    pub fn new(client: PharmacyClient, page_size: u32) -> Self {
        Self {
            client,
            list: ListController::new(String::new(), page_size),
        }
    }

    /// Search skips server paging entirely; whatever comes back is shown as
    /// one page.
    async fn fetch(&self, ticket: &ReloadTicket<String>) -> Result<Page<Medication>, PortalError> {
        if ticket.filter.is_empty() {
            self.client.medications(ticket.page).await
        } else {
            self.client
                .search_medications(&ticket.filter)
                .await
                .map(Page::single)
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
}

#[async_trait]
impl Screen for MedicationListScreen {
    fn title(&self) -> String {
        "Medications".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.reload().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Medications\n\n");

        match self.list.phase() {
            ListPhase::Idle | ListPhase::Loading => out.push_str("  Loading...\n"),
            ListPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            ListPhase::Loaded(loaded) => {
                let rows: Vec<Vec<String>> = loaded
                    .rows
                    .iter()
                    .map(|m| {
                        vec![
                            m.name.clone(),
                            m.generic_name.clone(),
                            m.category.to_string(),
                            m.dosage_form.to_string(),
                            m.strength.clone(),
                            format!("${:.2}", m.unit_price),
                            if m.requires_prescription { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["NAME", "GENERIC", "CATEGORY", "FORM", "STRENGTH", "PRICE", "RX"],
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

        if !self.list.filter().is_empty() {
            out.push_str(&format!("\n  Search: {}\n", self.list.filter()));
        }

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | search <name> | clear | prescriptions | inventory | reload\n",
        );
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
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
                    self.list.set_filter(rest.to_string());
                    self.reload().await
                }
            }
            "clear" => {
                self.list.set_filter(String::new());
                self.reload().await
            }
            "prescriptions" => ScreenEvent::NavigateTo("/pharmacy/prescriptions".to_string()),
            "inventory" => ScreenEvent::NavigateTo("/pharmacy/inventory".to_string()),
            "reload" => self.reload().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | search <name> | clear | prescriptions | inventory | reload",
            ),
        }
    }
}
