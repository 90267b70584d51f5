//! Storage row types. Kept apart from the client-side session type so the
//! storage layer stays independent of the store crate.
use chrono::{DateTime, Utc};

pub struct KvRow {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// What survives a restart: both fields are written together on login and
/// removed together on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub username: String,
}
