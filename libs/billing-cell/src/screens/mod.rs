mod detail;
mod form;
mod list;

pub use detail::InvoiceDetailScreen;
pub use form::InvoiceFormScreen;
pub use list::InvoiceListScreen;

/// Two-decimal dollar rendering, matching the gateway's currency.
pub(crate) fn usd(amount: f64) -> String {
    format!("${:.2}", amount)
}
