use chatter_types::{Channel, ChannelId, Message, SessionContext};

/// Everything that can change client state. Request outcomes only reach the
/// store after the server answered, so a failed mutation never shows up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // -- Auth --
    AuthStarted,
    AuthSucceeded(SessionContext),
    AuthFailed(String),
    LoggedOut,

    // -- Initial fetch --
    ChannelsLoading,
    ChannelsLoaded(Vec<Channel>),
    ChannelsFailed(String),
    MessagesLoading,
    MessagesLoaded(Vec<Message>),
    MessagesFailed(String),

    // -- Channel lifecycle --
    ChannelCreated(Channel),
    ChannelRenamed { id: ChannelId, name: String },
    ChannelRemoved(ChannelId),
    ChannelSelected(ChannelId),

    /// A message from either the push feed or the response to a local send.
    MessageReceived(Message),

    ClearChannelError,
    ClearMessageError,
}
