pub mod models;
pub mod screens;
pub mod services;

pub use models::*;
pub use screens::*;
pub use services::patient::PatientClient;
