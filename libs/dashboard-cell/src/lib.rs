pub mod screens;

pub use screens::DashboardScreen;
