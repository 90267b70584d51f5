use serde::{Deserialize, Serialize};

use crate::models::{ChannelId, Message};

/// Events delivered on the push feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum PushEvent {
    /// A message was posted to some channel by any connected client,
    /// including this one.
    NewMessage(Message),
}

/// Untyped view of a frame, used to tell unknown event types apart from
/// malformed ones.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
}

impl PushEvent {
    pub const KNOWN_TYPES: &'static [&'static str] = &["newMessage"];

    /// Decode one text frame. Frames with an event type this client does not
    /// know return `Ok(None)` so callers can skip them.
    pub fn decode(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let raw: RawFrame = serde_json::from_str(text)?;
        if !Self::KNOWN_TYPES.contains(&raw.kind.as_str()) {
            return Ok(None);
        }
        serde_json::from_str(text).map(Some)
    }

    pub fn channel_id(&self) -> ChannelId {
        match self {
            Self::NewMessage(message) => message.channel_id,
        }
    }
}
