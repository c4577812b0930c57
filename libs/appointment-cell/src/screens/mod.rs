mod detail;
mod form;
mod list;

pub use detail::AppointmentDetailScreen;
pub use form::AppointmentFormScreen;
pub use list::AppointmentListScreen;
