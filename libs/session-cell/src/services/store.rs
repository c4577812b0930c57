use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use shared_models::PortalError;

use crate::models::Session;

/// Persists the bearer token across portal runs, one token per file. On
/// load, an unreadable or expired token is treated as no session at all;
/// the operator simply logs in again.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<Session> {
        let token = match fs::read_to_string(&self.path) {
            Ok(token) => token.trim().to_string(),
            Err(_) => return None,
        };
        if token.is_empty() {
            return None;
        }

        match Session::from_token(token) {
            Ok(session) if !session.is_expired() => {
                debug!("Restored session for {}", session.username);
                Some(session)
            }
            Ok(session) => {
                debug!("Stored session for {} has expired", session.username);
                None
            }
            Err(err) => {
                warn!("Ignoring unreadable session file: {}", err);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), PortalError> {
        fs::write(&self.path, &session.token)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), PortalError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
