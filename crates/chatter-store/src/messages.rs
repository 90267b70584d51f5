use std::collections::HashSet;

use chatter_types::{ChannelId, Message, MessageId};
use tracing::debug;

use crate::action::Action;
use crate::status::FetchStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesState {
    pub messages: Vec<Message>,
    pub status: FetchStatus,
    pub error: Option<String>,
    /// Ids already in `messages`. A push echo of a message this client just
    /// sent carries the same server id and is dropped here.
    seen: HashSet<MessageId>,
    /// Channels removed by this client. Pushes that were already in flight
    /// for them are dropped instead of left behind as orphans.
    removed_channels: HashSet<ChannelId>,
}

impl MessagesState {
    pub fn contains(&self, id: MessageId) -> bool {
        self.seen.contains(&id)
    }

    pub fn in_channel(&self, channel_id: ChannelId) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.channel_id == channel_id)
    }

    pub fn count_in_channel(&self, channel_id: ChannelId) -> usize {
        self.in_channel(channel_id).count()
    }

    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::MessagesLoading => {
                self.status = FetchStatus::Loading;
                self.error = None;
            }
            Action::MessagesLoaded(fetched) => {
                // Pushes that raced the fetch stay, after the fetched history.
                let late: Vec<Message> = self
                    .messages
                    .drain(..)
                    .filter(|m| !fetched.iter().any(|f| f.id == m.id))
                    .collect();

                self.seen.clear();
                for message in fetched.iter().chain(late.iter()) {
                    self.push_unique(message.clone());
                }
                self.status = FetchStatus::Succeeded;
                self.error = None;
            }
            Action::MessagesFailed(error) => {
                self.status = FetchStatus::Failed;
                self.error = Some(error.clone());
            }
            Action::MessageReceived(message) => {
                if self.removed_channels.contains(&message.channel_id) {
                    debug!(
                        "Dropping message {} for removed channel {}",
                        message.id, message.channel_id
                    );
                } else if !self.push_unique(message.clone()) {
                    debug!("Dropping duplicate message {}", message.id);
                }
            }
            Action::ChannelRemoved(channel_id) => {
                self.removed_channels.insert(*channel_id);
                let seen = &mut self.seen;
                self.messages.retain(|m| {
                    if m.channel_id == *channel_id {
                        seen.remove(&m.id);
                        false
                    } else {
                        true
                    }
                });
            }
            Action::ClearMessageError => {
                self.error = None;
            }
            Action::LoggedOut => {
                *self = Self::default();
            }
            _ => {}
        }
    }

    fn push_unique(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }
}
