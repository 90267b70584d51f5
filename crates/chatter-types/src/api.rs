use serde::{Deserialize, Serialize};

use crate::models::{ChannelId, wire_id};

// -- Auth --

/// Body of both `POST /login` and `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

// -- Channels --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChannelRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChannelRequest {
    pub name: String,
}

// -- Messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest {
    pub body: String,
    #[serde(with = "wire_id")]
    pub channel_id: ChannelId,
    pub username: String,
}

/// Error body some endpoints return alongside a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
