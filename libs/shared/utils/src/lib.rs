pub mod claims;
pub mod test_utils;

pub use claims::{decode_claims, TokenClaims};
