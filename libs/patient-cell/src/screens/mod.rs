mod detail;
mod form;
mod list;

pub use detail::PatientDetailScreen;
pub use form::PatientFormScreen;
pub use list::PatientListScreen;
