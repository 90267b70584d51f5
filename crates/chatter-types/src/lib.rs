//! Wire types shared by the chatter client crates.
//!
//! `models` are the records the backend hands out, `api` the REST bodies,
//! `events` the frames delivered on the push feed. `session` is the explicit
//! login context threaded through requests.

pub mod api;
pub mod events;
pub mod models;
pub mod session;

pub use events::PushEvent;
pub use models::{Channel, ChannelId, DEFAULT_CHANNEL_ID, Message, MessageId};
pub use session::SessionContext;
