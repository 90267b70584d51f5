use chatter_client::{ClientError, PushSignal};
use chatter_types::{Channel, ChannelId, Message};

/// What the view asks for. None of these block; outcomes come back as store
/// changes and notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch channel and message lists again.
    Refresh,
    SelectChannel(ChannelId),
    CreateChannel(String),
    RenameChannel { id: ChannelId, name: String },
    RemoveChannel(ChannelId),
    SendMessage(String),
    /// Forget the stored fetch errors.
    DismissErrors,
    Shutdown,
}

/// Outcome of a request the coordinator spawned.
#[derive(Debug)]
pub enum Completion {
    Channels(Result<Vec<Channel>, ClientError>),
    Messages(Result<Vec<Message>, ClientError>),
    ChannelCreated(Result<Channel, ClientError>),
    ChannelRenamed {
        id: ChannelId,
        result: Result<Channel, ClientError>,
    },
    ChannelRemoved {
        id: ChannelId,
        result: Result<(), ClientError>,
    },
    MessageSent(Result<Message, ClientError>),
}

/// Everything on the coordinator's inbound queue.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    Completed(Completion),
    Push(PushSignal),
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<Completion> for Event {
    fn from(completion: Completion) -> Self {
        Self::Completed(completion)
    }
}

impl From<PushSignal> for Event {
    fn from(signal: PushSignal) -> Self {
        Self::Push(signal)
    }
}
