use serde::{Deserialize, Serialize};

pub type ChannelId = u64;
pub type MessageId = u64;

/// Channel selected when nothing else is, and the fallback after the current
/// channel is removed. The backend seeds it and never lets it be removed.
pub const DEFAULT_CHANNEL_ID: ChannelId = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(with = "wire_id")]
    pub id: ChannelId,
    pub name: String,
    #[serde(default = "default_removable")]
    pub removable: bool,
}

fn default_removable() -> bool {
    true
}

/// Messages are immutable once created; the server id is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(with = "wire_id")]
    pub id: MessageId,
    #[serde(with = "wire_id")]
    pub channel_id: ChannelId,
    pub username: String,
    pub body: String,
}

/// The backend hands ids out either as JSON numbers or as numeric strings
/// (`"1"`). Both decode to an integer; encoding always emits a number.
pub mod wire_id {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(id) => Ok(id),
            NumberOrString::String(raw) => raw.trim().parse().map_err(|_| {
                de::Error::invalid_value(de::Unexpected::Str(&raw), &"a non-negative integer id")
            }),
        }
    }

    pub fn serialize<S>(id: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*id)
    }
}
