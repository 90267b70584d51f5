use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::Database;
use crate::models::StoredSession;

const TOKEN_KEY: &str = "token";
const USERNAME_KEY: &str = "username";

/// Persists the login session across restarts.
#[derive(Clone)]
pub struct SessionRepo {
    db: Arc<Database>,
}

impl SessionRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// A session only counts when both halves are present; a token without a
    /// username (or the reverse) is treated as logged out.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let token = self.db.get_value(TOKEN_KEY)?;
        let username = self.db.get_value(USERNAME_KEY)?;

        match (token, username) {
            (Some(token), Some(username)) => Ok(Some(StoredSession { token, username })),
            (None, None) => Ok(None),
            _ => {
                warn!("Stored session is incomplete, ignoring it");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        self.db.set_values(&[
            (TOKEN_KEY, session.token.as_str()),
            (USERNAME_KEY, session.username.as_str()),
        ])?;
        info!("Session stored for {}", session.username);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let removed = self.db.delete_values(&[TOKEN_KEY, USERNAME_KEY])?;
        if removed > 0 {
            info!("Stored session cleared");
        }
        Ok(())
    }
}
