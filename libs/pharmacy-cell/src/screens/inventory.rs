use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use shared_screens::{
    pager_line, render_table, split_first_word, ListController, ListPhase, Screen, ScreenEvent,
};

use crate::models::InventoryItem;
use crate::services::pharmacy::PharmacyClient;

/// Stock overview: a low-stock alert strip over a paginated batch table,
/// with commands to correct quantities and register incoming stock.
pub struct InventoryScreen {
    client: PharmacyClient,
    list: ListController<InventoryItem, ()>,
    alerts: Vec<InventoryItem>,
}

impl InventoryScreen {
    pub fn new(client: PharmacyClient, page_size: u32) -> Self {
        Self {
            client,
            list: ListController::new((), page_size),
            alerts: Vec::new(),
        }
    }

    async fn reload(&mut self) -> ScreenEvent {
        let ticket = self.list.begin_reload();
        let result = self.client.inventory(ticket.page).await;
        let expired = matches!(&result, Err(err) if err.is_unauthenticated());
        self.list.apply(ticket, result);
        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    async fn load_alerts(&mut self) -> ScreenEvent {
        match self.client.low_stock().await {
            Ok(items) => {
                self.alerts = items;
                ScreenEvent::None
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // The strip is an extra; the table still works without it.
            Err(_) => {
                self.alerts.clear();
                ScreenEvent::None
            }
        }
    }

    /// The table and the strip come from different endpoints; a quantity
    /// change can move a batch in or out of the strip, so both refresh.
    async fn refresh(&mut self) -> ScreenEvent {
        let event = self.reload().await;
        if event != ScreenEvent::None {
            return event;
        }
        self.load_alerts().await
    }

    async fn adjust(&mut self, rest: &str) -> ScreenEvent {
        let (id_text, quantity_text) = split_first_word(rest);
        let (Ok(id), Ok(quantity)) = (id_text.parse::<i64>(), quantity_text.trim().parse::<u32>())
        else {
            return ScreenEvent::notify_error("Usage: adjust <id> <quantity>");
        };

        match self.client.adjust_quantity(id, quantity).await {
            Ok(item) => {
                let event = self.refresh().await;
                if event != ScreenEvent::None {
                    return event;
                }
                ScreenEvent::notify_success(format!(
                    "{} ({}) now at {} units",
                    item.medication_name, item.batch_number, item.quantity
                ))
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // A failed action leaves the listing exactly as it was.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    async fn add(&mut self, rest: &str) -> ScreenEvent {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [medication_id, quantity, batch_number, expiry] = parts[..] else {
            return ScreenEvent::notify_error(
                "Usage: add <medicationId> <quantity> <batchNumber> <expiryDate>",
            );
        };
        let (Ok(medication_id), Ok(quantity)) =
            (medication_id.parse::<i64>(), quantity.parse::<u32>())
        else {
            return ScreenEvent::notify_error(
                "Usage: add <medicationId> <quantity> <batchNumber> <expiryDate>",
            );
        };
        let Ok(expiry_date) = NaiveDate::parse_from_str(expiry, "%Y-%m-%d") else {
            return ScreenEvent::notify_error("expiryDate must be YYYY-MM-DD");
        };

        match self
            .client
            .add_stock(medication_id, quantity, batch_number, expiry_date)
            .await
        {
            Ok(item) => {
                let event = self.refresh().await;
                if event != ScreenEvent::None {
                    return event;
                }
                ScreenEvent::notify_success(format!(
                    "Added {} units of {} (batch {})",
                    quantity, item.medication_name, item.batch_number
                ))
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }
}

#[async_trait]
impl Screen for InventoryScreen {
    fn title(&self) -> String {
        "Inventory Management".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.refresh().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Inventory Management\n\n");

        if !self.alerts.is_empty() {
            let chips: Vec<String> = self
                .alerts
                .iter()
                .map(|item| format!("{} ({} left)", item.medication_name, item.quantity))
                .collect();
            out.push_str(&format!("  Low stock: {}\n\n", chips.join(", ")));
        }

        match self.list.phase() {
            ListPhase::Idle | ListPhase::Loading => out.push_str("  Loading...\n"),
            ListPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            ListPhase::Loaded(loaded) => {
                let today = Utc::now().date_naive();
                let rows: Vec<Vec<String>> = loaded
                    .rows
                    .iter()
                    .map(|item| {
                        let expiry = if item.expires_soon(today) {
                            format!("{} (soon)", item.expiry_date)
                        } else {
                            item.expiry_date.to_string()
                        };
                        vec![
                            item.id.to_string(),
                            item.medication_name.clone(),
                            item.batch_number.clone(),
                            item.quantity.to_string(),
                            item.reorder_level.to_string(),
                            expiry,
                            item.location.clone(),
                            item.stock_label().to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(
                    &["ID", "MEDICATION", "BATCH", "QTY", "REORDER", "EXPIRY", "LOCATION", "STATUS"],
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

        out.push_str(
            "\nCommands: next | prev | page <n> | size <n> | adjust <id> <quantity> | add <medicationId> <quantity> <batchNumber> <expiryDate> | medications | prescriptions | reload\n",
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
            "adjust" => self.adjust(rest).await,
            "add" => self.add(rest).await,
            "medications" => ScreenEvent::NavigateTo("/pharmacy/medications".to_string()),
            "prescriptions" => ScreenEvent::NavigateTo("/pharmacy/prescriptions".to_string()),
            "reload" => self.reload().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: next | prev | page <n> | size <n> | adjust <id> <quantity> | add <medicationId> <quantity> <batchNumber> <expiryDate> | medications | prescriptions | reload",
            ),
        }
    }
}
