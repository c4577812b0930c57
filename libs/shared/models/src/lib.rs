pub mod envelope;
pub mod error;
pub mod notice;
pub mod page;

pub use envelope::ApiEnvelope;
pub use error::PortalError;
pub use notice::{Notice, NoticeKind};
pub use page::{Page, PageRequest};
