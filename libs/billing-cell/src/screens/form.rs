use async_trait::async_trait;
use chrono::NaiveDate;

use shared_screens::{
    split_first_word, FormController, FormMode, Screen, ScreenEvent, SubmitBlocked,
};

use crate::models::{InvoiceItem, InvoiceRequest, ItemCategory};
use crate::screens::usd;
use crate::services::billing::BillingClient;

/// One line item as typed. Category, quantity and price carry defaults so a
/// fresh row only needs a description.
#[derive(Debug)]
struct ItemDraft {
    description: String,
    category: String,
    quantity: String,
    unit_price: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: "CONSULTATION".to_string(),
            quantity: "1".to_string(),
            unit_price: "0".to_string(),
        }
    }
}

impl ItemDraft {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            "description" => &mut self.description,
            "category" => &mut self.category,
            "quantity" => &mut self.quantity,
            "unitPrice" => &mut self.unit_price,
            _ => return None,
        };
        Some(field)
    }

    /// Line total when both numbers parse, for the running estimate.
    fn estimate(&self) -> Option<f64> {
        let quantity = self.quantity.trim().parse::<u32>().ok()?;
        let unit_price = self.unit_price.trim().parse::<f64>().ok()?;
        Some(f64::from(quantity) * unit_price)
    }
}

/// Field values as typed by the operator. Everything is kept as text until
/// submission so a rejected submit loses nothing.
#[derive(Debug)]
struct InvoiceDraft {
    patient_id: String,
    due_date: String,
    discount: String,
    notes: String,
    items: Vec<ItemDraft>,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self {
            patient_id: String::new(),
            due_date: String::new(),
            discount: "0".to_string(),
            notes: String::new(),
            items: vec![ItemDraft::default()],
        }
    }
}

impl InvoiceDraft {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            "patientId" => &mut self.patient_id,
            "dueDate" => &mut self.due_date,
            "discount" => &mut self.discount,
            "notes" => &mut self.notes,
            _ => return None,
        };
        Some(field)
    }

    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.patient_id.trim().is_empty() {
            missing.push("patientId".to_string());
        }
        if self.due_date.trim().is_empty() {
            missing.push("dueDate".to_string());
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.description.trim().is_empty() {
                missing.push(format!("item {} description", index + 1));
            }
        }
        missing
    }

    /// Running totals for the unsaved draft. Rows that do not parse yet are
    /// left out. Once an invoice is saved the gateway's figures are shown
    /// instead, never these.
    fn estimated_totals(&self) -> (f64, f64) {
        let subtotal: f64 = self.items.iter().filter_map(ItemDraft::estimate).sum();
        let discount = self.discount.trim().parse::<f64>().unwrap_or(0.0);
        (subtotal, subtotal - discount)
    }

    /// Turns the drafts into a request body, or a message naming the first
    /// field that does not parse.
    fn build_request(&self) -> Result<InvoiceRequest, String> {
        let patient_id = self
            .patient_id
            .trim()
            .parse::<i64>()
            .map_err(|_| "patientId must be a number".to_string())?;
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| "dueDate must be YYYY-MM-DD".to_string())?;
        let discount_amount = match self.discount.trim().parse::<f64>() {
            Ok(discount) if discount >= 0.0 => discount,
            _ => return Err("discount must be a non-negative number".to_string()),
        };

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let line = index + 1;
            let category = ItemCategory::parse(&item.category).ok_or_else(|| {
                format!(
                    "item {} category must be CONSULTATION, PROCEDURE, MEDICATION, LAB_TEST, ROOM_CHARGE or OTHER",
                    line
                )
            })?;
            let quantity = match item.quantity.trim().parse::<u32>() {
                Ok(quantity) if quantity >= 1 => quantity,
                _ => return Err(format!("item {} quantity must be at least 1", line)),
            };
            let unit_price = match item.unit_price.trim().parse::<f64>() {
                Ok(price) if price >= 0.0 => price,
                _ => return Err(format!("item {} unitPrice must be a non-negative number", line)),
            };

            items.push(InvoiceItem {
                id: None,
                description: item.description.trim().to_string(),
                quantity,
                unit_price,
                amount: f64::from(quantity) * unit_price,
                category,
            });
        }

        let notes = self.notes.trim();
        Ok(InvoiceRequest {
            patient_id,
            appointment_id: None,
            items,
            discount_amount,
            due_date,
            notes: if notes.is_empty() { None } else { Some(notes.to_string()) },
        })
    }
}

/// Create form for invoices. Saved invoices are immutable from this portal;
/// there is no edit mode.
pub struct InvoiceFormScreen {
    client: BillingClient,
    form: FormController,
    draft: InvoiceDraft,
}

impl InvoiceFormScreen {
    pub fn new(client: BillingClient) -> Self {
        Self {
            client,
            form: FormController::new(FormMode::Create),
            draft: InvoiceDraft::default(),
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

        let result = self.client.create(&request).await;
        self.form.finish_submit();

        match result {
            Ok(_) => ScreenEvent::saved("Invoice created successfully", "/billing"),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            // The drafts stay as typed; the operator corrects and resubmits.
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn edit_item(&mut self, rest: &str) -> ScreenEvent {
        let (index_text, rest) = split_first_word(rest);
        let Some(index) = self.item_index(index_text) else {
            return ScreenEvent::notify_error(format!("No item {}", index_text));
        };

        let (field, value) = split_first_word(rest);
        match self.draft.items[index].field_mut(field) {
            Some(slot) => {
                *slot = value.to_string();
                ScreenEvent::None
            }
            None => ScreenEvent::notify_error(format!("Unknown item field: {}", field)),
        }
    }

    fn remove_item(&mut self, rest: &str) -> ScreenEvent {
        if self.draft.items.len() == 1 {
            return ScreenEvent::notify_error("An invoice needs at least one item");
        }
        let Some(index) = self.item_index(rest.trim()) else {
            return ScreenEvent::notify_error(format!("No item {}", rest.trim()));
        };
        self.draft.items.remove(index);
        ScreenEvent::None
    }

    /// Items are numbered from 1 on screen.
    fn item_index(&self, text: &str) -> Option<usize> {
        let number = text.parse::<usize>().ok()?;
        if number >= 1 && number <= self.draft.items.len() {
            Some(number - 1)
        } else {
            None
        }
    }
}

#[async_trait]
impl Screen for InvoiceFormScreen {
    fn title(&self) -> String {
        "New invoice".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        ScreenEvent::None
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n\n", self.title());
        let draft = &self.draft;

        out.push_str(&format!("  patientId: {}\n", draft.patient_id));
        out.push_str(&format!("  dueDate:   {}\n", draft.due_date));
        out.push_str(&format!("  discount:  {}\n", draft.discount));
        out.push_str(&format!("  notes:     {}\n", draft.notes));

        out.push_str("\nItems:\n");
        for (index, item) in draft.items.iter().enumerate() {
            out.push_str(&format!(
                "  {}. description: {} | category: {} | quantity: {} | unitPrice: {}\n",
                index + 1,
                item.description,
                item.category,
                item.quantity,
                item.unit_price
            ));
        }

        let (subtotal, total) = draft.estimated_totals();
        out.push_str(&format!("\n  Estimated subtotal: {}\n", usd(subtotal)));
        out.push_str(&format!("  Estimated total:    {}\n", usd(total)));

        if self.form.in_flight() {
            out.push_str("\n  Submitting...\n");
        }
        out.push_str(
            "\nCommands: set <field> <value> | item <n> <field> <value> | add | remove <n> | submit | back\n",
        );
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
            "item" => self.edit_item(rest),
            "add" => {
                self.draft.items.push(ItemDraft::default());
                ScreenEvent::None
            }
            "remove" => self.remove_item(rest),
            "submit" => self.submit().await,
            "back" => ScreenEvent::NavigateTo("/billing".to_string()),
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: set <field> <value> | item <n> <field> <value> | add | remove <n> | submit | back",
            ),
        }
    }
}
