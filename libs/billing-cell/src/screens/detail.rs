use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use shared_screens::{split_first_word, DetailPhase, Screen, ScreenEvent};

use crate::models::{Invoice, Payment, PaymentMethod};
use crate::screens::usd;
use crate::services::billing::BillingClient;

/// Full view of one invoice: line items, the gateway's totals verbatim, the
/// payment history, and actions to export the PDF or record a payment.
pub struct InvoiceDetailScreen {
    client: BillingClient,
    id: i64,
    phase: DetailPhase<Invoice>,
    payments: Option<Vec<Payment>>,
    download_dir: PathBuf,
}

impl InvoiceDetailScreen {
    pub fn new(client: BillingClient, id: i64, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            id,
            phase: DetailPhase::Idle,
            payments: None,
            download_dir: download_dir.into(),
        }
    }

    async fn load(&mut self) -> ScreenEvent {
        self.phase = DetailPhase::Loading;
        match self.client.invoice(self.id).await {
            Ok(invoice) => {
                self.phase = DetailPhase::Loaded(invoice);
                ScreenEvent::None
            }
            Err(err) if err.is_not_found() => ScreenEvent::NavigateTo("/billing".to_string()),
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => {
                self.phase = DetailPhase::Error { message: err.notice_text() };
                ScreenEvent::None
            }
        }
    }

    async fn download_pdf(&self) -> ScreenEvent {
        let Some(invoice) = self.phase.entity() else {
            return ScreenEvent::None;
        };
        let file_name = format!("invoice-{}.pdf", invoice.invoice_number);

        let bytes = match self.client.invoice_pdf(self.id).await {
            Ok(bytes) => bytes,
            Err(err) if err.is_unauthenticated() => return ScreenEvent::SessionExpired,
            Err(err) => return ScreenEvent::notify_error(err.notice_text()),
        };

        let target = self.download_dir.join(file_name);
        match tokio::fs::write(&target, bytes).await {
            Ok(()) => ScreenEvent::notify_success(format!("Saved {}", target.display())),
            Err(err) => ScreenEvent::notify_error(format!("Could not save PDF: {}", err)),
        }
    }

    /// `pay <amount> <method>`. The gateway answers with the updated invoice,
    /// which replaces the one on screen.
    async fn record_payment(&mut self, rest: &str) -> ScreenEvent {
        let payable = match self.phase.entity() {
            Some(invoice) => invoice.is_payable(),
            None => return ScreenEvent::None,
        };
        if !payable {
            return ScreenEvent::notify_error("Nothing is owed on this invoice");
        }

        let (amount_text, method_text) = split_first_word(rest);
        let amount = match amount_text.parse::<f64>() {
            Ok(amount) if amount > 0.0 => amount,
            _ => return ScreenEvent::notify_error("Usage: pay <amount> <method>"),
        };
        let Some(method) = PaymentMethod::parse(method_text) else {
            return ScreenEvent::notify_error(
                "Method must be CASH, CREDIT_CARD, DEBIT_CARD, INSURANCE, BANK_TRANSFER or CHECK",
            );
        };

        let payment = Payment {
            id: None,
            invoice_id: self.id,
            amount,
            payment_method: method,
            transaction_reference: None,
            payment_date: Utc::now().date_naive(),
            notes: None,
        };

        match self.client.record_payment(self.id, &payment).await {
            Ok(updated) => {
                self.phase = DetailPhase::Loaded(updated);
                // The history on screen is stale now; drop it until re-asked.
                self.payments = None;
                ScreenEvent::notify_success(format!("Payment of {} recorded", usd(amount)))
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    async fn load_payments(&mut self) -> ScreenEvent {
        match self.client.payments(self.id).await {
            Ok(payments) => {
                self.payments = Some(payments);
                ScreenEvent::None
            }
            Err(err) if err.is_unauthenticated() => ScreenEvent::SessionExpired,
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }

    fn render_invoice(&self, invoice: &Invoice, out: &mut String) {
        out.push_str(&format!("  Invoice:  {}\n", invoice.invoice_number));
        out.push_str(&format!(
            "  Patient:  {} (#{})\n",
            invoice.patient_name, invoice.patient_id
        ));
        out.push_str(&format!("  Due date: {}\n", invoice.due_date));
        out.push_str(&format!("  Status:   {}\n", invoice.status));
        if let Some(notes) = &invoice.notes {
            out.push_str(&format!("  Notes:    {}\n", notes));
        }

        out.push_str("\nItems:\n");
        for item in &invoice.items {
            out.push_str(&format!(
                "  {} [{}]  {} x {} = {}\n",
                item.description,
                item.category,
                item.quantity,
                usd(item.unit_price),
                usd(item.amount)
            ));
        }

        // Totals come straight from the envelope.
        out.push_str(&format!("\n  Subtotal:    {}\n", usd(invoice.subtotal)));
        if invoice.discount_amount > 0.0 {
            out.push_str(&format!("  Discount:   -{}\n", usd(invoice.discount_amount)));
        }
        out.push_str(&format!("  Tax:         {}\n", usd(invoice.tax_amount)));
        out.push_str(&format!("  Total:       {}\n", usd(invoice.total_amount)));
        out.push_str(&format!("  Paid:        {}\n", usd(invoice.paid_amount)));
        out.push_str(&format!("  Balance due: {}\n", usd(invoice.balance_amount)));
    }

    fn render_payments(&self, out: &mut String) {
        let Some(payments) = &self.payments else {
            return;
        };

        out.push_str("\nPayments:\n");
        if payments.is_empty() {
            out.push_str("  (none)\n");
            return;
        }
        for payment in payments {
            out.push_str(&format!(
                "  {}  {}  {}\n",
                payment.payment_date,
                usd(payment.amount),
                payment.payment_method
            ));
        }
    }
}

#[async_trait]
impl Screen for InvoiceDetailScreen {
    fn title(&self) -> String {
        format!("Invoice {}", self.id)
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.load().await
    }

    fn render(&self) -> String {
        let mut out = format!("Invoice {}\n\n", self.id);

        match &self.phase {
            DetailPhase::Idle | DetailPhase::Loading => out.push_str("  Loading...\n"),
            DetailPhase::Error { message } => {
                out.push_str(&format!("  {}\n  Type `reload` to try again.\n", message));
            }
            DetailPhase::Loaded(invoice) => {
                self.render_invoice(invoice, &mut out);
                self.render_payments(&mut out);
            }
        }

        let payable = self.phase.entity().map(Invoice::is_payable).unwrap_or(false);
        if payable {
            out.push_str("\nCommands: pdf | pay <amount> <method> | payments | patient | back | reload\n");
        } else {
            out.push_str("\nCommands: pdf | payments | patient | back | reload\n");
        }
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        let (verb, rest) = split_first_word(input);
        match verb {
            "pdf" => self.download_pdf().await,
            "pay" => self.record_payment(rest).await,
            "payments" => self.load_payments().await,
            "patient" => match self.phase.entity() {
                Some(invoice) => ScreenEvent::NavigateTo(format!("/patients/{}", invoice.patient_id)),
                None => ScreenEvent::None,
            },
            "back" => ScreenEvent::NavigateTo("/billing".to_string()),
            "reload" => self.load().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: pdf | pay <amount> <method> | payments | patient | back | reload",
            ),
        }
    }
}
