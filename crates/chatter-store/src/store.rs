use chatter_types::{Channel, Message, SessionContext};

use crate::action::Action;
use crate::auth::AuthState;
use crate::channels::ChannelsState;
use crate::messages::MessagesState;
use crate::status::FetchStatus;

/// Root of client state. Every action is offered to every slice, so an action
/// that touches two slices (removing a channel drops its messages too) is
/// applied atomically from the reader's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub auth: AuthState,
    pub channels: ChannelsState,
    pub messages: MessagesState,
}

impl Store {
    pub fn new(session: SessionContext) -> Self {
        Self {
            auth: AuthState::restored(session),
            ..Self::default()
        }
    }

    pub fn reduce(&mut self, action: &Action) {
        self.auth.reduce(action);
        self.channels.reduce(action);
        self.messages.reduce(action);
    }

    pub fn session(&self) -> &SessionContext {
        &self.auth.session
    }

    pub fn current_channel(&self) -> Option<&Channel> {
        self.channels.current()
    }

    pub fn current_messages(&self) -> Vec<&Message> {
        self.messages
            .in_channel(self.channels.current_channel_id)
            .collect()
    }

    /// Both lists have loaded; the chat view can render.
    pub fn is_ready(&self) -> bool {
        self.channels.status.is_ready() && self.messages.status.is_ready()
    }

    /// Either list failed to load. Stays true after the error text has been
    /// dismissed, until the next fetch starts.
    pub fn fetch_failed(&self) -> bool {
        self.channels.status == FetchStatus::Failed || self.messages.status == FetchStatus::Failed
    }

    /// The first fetch error, if any; the view shows it instead of content.
    pub fn fetch_error(&self) -> Option<&str> {
        self.messages
            .error
            .as_deref()
            .or(self.channels.error.as_deref())
    }
}
