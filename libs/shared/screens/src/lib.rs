pub mod confirm;
pub mod detail;
pub mod form;
pub mod list;
pub mod screen;
pub mod text;

pub use confirm::{Confirm, ConfirmGate};
pub use detail::DetailPhase;
pub use form::{FormController, FormMode, SubmitBlocked};
pub use list::{Applied, ListController, ListPhase, LoadedPage, ReloadTicket};
pub use screen::{Screen, ScreenEvent};
pub use text::{pager_line, render_table, split_first_word};
