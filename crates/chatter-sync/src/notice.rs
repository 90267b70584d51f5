use std::fmt;

use chrono::{DateTime, Utc};

use chatter_client::ClientError;
use chatter_store::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient notification for the view. Mutation outcomes are reported only
/// this way; they are never returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ChannelCreated { name: String },
    ChannelNotCreated { reason: String },
    ChannelRenamed { name: String },
    ChannelNotRenamed { reason: String },
    ChannelRemoved,
    ChannelNotRemoved { reason: String },
    MessageNotSent { reason: String },
    /// Rejected before any request was made.
    Invalid(ValidationError),
    FetchFailed { reason: String },
    /// The server refused the stored token.
    SessionExpired,
    PushDisconnected { reason: String },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::ChannelCreated { .. } | Self::ChannelRenamed { .. } | Self::ChannelRemoved => {
                NoticeLevel::Success
            }
            Self::PushDisconnected { .. } => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        }
    }

    /// Map a failed request to a notice; a 401 always becomes
    /// `SessionExpired` whatever the operation was.
    pub(crate) fn from_failure(err: &ClientError, otherwise: impl FnOnce(String) -> Self) -> Self {
        if err.is_unauthorized() {
            Self::SessionExpired
        } else {
            otherwise(err.to_string())
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelCreated { name } => write!(f, "Channel #{name} created"),
            Self::ChannelNotCreated { reason } => write!(f, "Channel not created: {reason}"),
            Self::ChannelRenamed { name } => write!(f, "Channel renamed to #{name}"),
            Self::ChannelNotRenamed { reason } => write!(f, "Channel not renamed: {reason}"),
            Self::ChannelRemoved => write!(f, "Channel removed"),
            Self::ChannelNotRemoved { reason } => write!(f, "Channel not removed: {reason}"),
            Self::MessageNotSent { reason } => write!(f, "Message not sent: {reason}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::FetchFailed { reason } => write!(f, "Loading failed: {reason}"),
            Self::SessionExpired => write!(f, "Session expired, log in again"),
            Self::PushDisconnected { reason } => write!(f, "Live updates stopped: {reason}"),
        }
    }
}

/// A notice with the time it was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped {
    pub at: DateTime<Utc>,
    pub notice: Notice,
}

impl Stamped {
    pub fn now(notice: Notice) -> Self {
        Self {
            at: Utc::now(),
            notice,
        }
    }
}
