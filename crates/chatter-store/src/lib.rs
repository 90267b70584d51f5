//! Client-side chat state.
//!
//! Three slices (auth, channels, messages) are folded from a stream of
//! `Action`s by pure reducers. Nothing in this crate performs I/O; the sync
//! coordinator owns the `Store` and feeds it the outcomes of requests and push
//! deliveries.

/// Actions folded into the store.
pub mod action;
/// Auth slice: session context plus login/signup request status.
pub mod auth;
/// Channel list and current-channel selection.
pub mod channels;
/// Message list with id-keyed idempotent application.
pub mod messages;
/// `Idle -> Loading -> Succeeded | Failed` request status.
pub mod status;
/// Root store combining the slices, with read-side selectors.
pub mod store;
/// Input checks run before any request is issued.
pub mod validation;

pub use action::Action;
pub use auth::AuthState;
pub use channels::ChannelsState;
pub use messages::MessagesState;
pub use status::FetchStatus;
pub use store::Store;
pub use validation::{
    CHANNEL_NAME_MAX, CHANNEL_NAME_MIN, ValidationError, validate_channel_name,
    validate_channel_removal, validate_channel_rename, validate_message_draft, validate_signup,
};
