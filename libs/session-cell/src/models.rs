use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_utils::decode_claims;

// ==============================================================================
// ROLES
// ==============================================================================

/// Staff roles the gateway issues. Route access is declared in terms of
/// these; holding any one declared role grants entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Pharmacist,
    Receptionist,
}

impl Role {
    /// Parses the role claim. Unknown strings yield `None`; a session with
    /// an unrecognized role is authenticated but holds no role.
    pub fn parse(value: &str) -> Option<Role> {
        match value.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "DOCTOR" => Some(Role::Doctor),
            "NURSE" => Some(Role::Nurse),
            "PHARMACIST" => Some(Role::Pharmacist),
            "RECEPTIONIST" => Some(Role::Receptionist),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Doctor => write!(f, "DOCTOR"),
            Role::Nurse => write!(f, "NURSE"),
            Role::Pharmacist => write!(f, "PHARMACIST"),
            Role::Receptionist => write!(f, "RECEPTIONIST"),
        }
    }
}

// ==============================================================================
// SESSION
// ==============================================================================

/// An authenticated operator: the bearer token plus the display claims
/// decoded from it. Expiry is read from the token's `exp` claim.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Option<Role>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Rebuilds a session from a stored or freshly issued token. Fails when
    /// the token's claims segment cannot be read.
    pub fn from_token(token: impl Into<String>) -> Result<Session, String> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Session {
            username: claims.sub.clone(),
            role: claims.role.as_deref().and_then(Role::parse),
            expires_at: claims.expires_at(),
            token,
        })
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => at < Utc::now(),
            None => false,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

// ==============================================================================
// AUTH WIRE MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}
