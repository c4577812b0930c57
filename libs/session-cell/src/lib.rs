pub mod context;
pub mod models;
pub mod screens;
pub mod services;

pub use context::SessionContext;
pub use models::{AuthResponse, RegisterRequest, Role, Session};
pub use screens::{LoginScreen, UnauthorizedScreen};
pub use services::auth::AuthClient;
pub use services::store::SessionStore;
