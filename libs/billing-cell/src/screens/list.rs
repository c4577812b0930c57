use std::path::PathBuf;

use async_trait::async_trait;

use shared_screens::{
    pager_line, render_table, split_first_word, ListController, ListPhase, Screen, ScreenEvent,
};

use crate::models::{Invoice, InvoiceStatus};
use crate::screens::usd;
use crate::services::billing::BillingClient;

/// Paginated invoice listing with a server-side status filter and a PDF
/// export row action.
pub struct InvoiceListScreen {
    client: BillingClient,
    list: ListController<Invoice, Option<InvoiceStatus>>,
    download_dir: PathBuf,
}

impl InvoiceListScreen {
    pub fn new(client: BillingClient, page_size: u32, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            list: ListController::new(None, page_size),
            download_dir: download_dir.into(),
        }
    }

    async fn reload(&mut self) -> ScreenEvent {
        let ticket = self.list.begin_reload();
        let result = self.client.invoices(ticket.page, ticket.filter).await;
        let expired = matches!(&result, Err(err) if err.is_unauthenticated());
        self.list.apply(ticket, result);
        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    async fn download_pdf(&self, id: i64) -> ScreenEvent {
        let bytes = match self.client.invoice_pdf(id).await {
            Ok(bytes) => bytes,
            Err(err) if err.is_unauthenticated() => return ScreenEvent::SessionExpired,
            Err(err) => return ScreenEvent::notify_error(err.notice_text()),
        };

        let target = self.download_dir.join(format!("invoice-{}.pdf", id));
        match tokio::fs::write(&target, bytes).await {
            Ok(()) => ScreenEvent::notify_success(format!("Saved {}", target.display())),
            Err(err) => ScreenEvent::notify_error(format!("Could not save PDF: {}", err)),
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
            "status" => match InvoiceStatus::parse(rest) {
                Some(status) => {
                    self.list.set_filter(Some(status));
                    self.reload().await
                }
                None => ScreenEvent::notify_error(
                    "Usage: status <DRAFT|PENDING|PARTIAL|PAID|OVERDUE|CANCELLED>",
                ),
            },
            "clear" => {
                self.list.set_filter(None);
                self.reload().await
            }
            "reload" => self.reload().await,
            "new" => ScreenEvent::NavigateTo("/billing/new".to_string()),
            "open" => match rest.parse::<i64>() {
                Ok(id) => ScreenEvent::NavigateTo(format!("/billing/{}", id)),
                Err(_) => ScreenEvent::notify_error("Usage: open <id>"),
            },
            "pdf" => match rest.parse::<i64>() {
                Ok(id) => self.download_pdf(id).await,
                Err(_) => ScreenEvent::notify_error("Usage: pdf <id>"),
            },
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | status <s> | clear | open <id> | new | pdf <id> | reload",
            ),
        }
    }
}

#[async_trait]
impl Screen for InvoiceListScreen {
    fn title(&self) -> String {
        "Billing".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.reload().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Billing & Invoices\n\n");

        match self.list.phase() {
            ListPhase::Idle | ListPhase::Loading => out.push_str("  Loading...\n"),
            ListPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            ListPhase::Loaded(loaded) => {
                let rows: Vec<Vec<String>> = loaded
                    .rows
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.to_string(),
                            i.invoice_number.clone(),
                            i.patient_name.clone(),
                            i.due_date.to_string(),
                            usd(i.total_amount),
                            usd(i.paid_amount),
                            usd(i.balance_amount),
                            i.status.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["ID", "INVOICE #", "PATIENT", "DUE DATE", "TOTAL", "PAID", "BALANCE", "STATUS"],
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

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | status <s> | clear | open <id> | new | pdf <id>\n",
        );
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        self.handle_command(input).await
    }
}
