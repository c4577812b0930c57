pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{evaluate, GuardDecision};
pub use navigator::{login_path, Navigator, QueryParams, Resolution};
pub use routes::{
    PathParams, Route, RouteAccess, RoutePattern, RouteTable, RouteTarget, ScreenId,
    BILLING_ROLES, PHARMACY_ROLES,
};
