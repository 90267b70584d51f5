use chatter_types::{Channel, ChannelId, DEFAULT_CHANNEL_ID};
use tracing::debug;

use crate::action::Action;
use crate::status::FetchStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelsState {
    pub channels: Vec<Channel>,
    pub current_channel_id: ChannelId,
    pub status: FetchStatus,
    pub error: Option<String>,
}

impl Default for ChannelsState {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            current_channel_id: DEFAULT_CHANNEL_ID,
            status: FetchStatus::Idle,
            error: None,
        }
    }
}

impl ChannelsState {
    pub fn get(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn current(&self) -> Option<&Channel> {
        self.get(self.current_channel_id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::ChannelsLoading => {
                self.status = FetchStatus::Loading;
                self.error = None;
            }
            Action::ChannelsLoaded(channels) => {
                self.channels = channels.clone();
                self.status = FetchStatus::Succeeded;
                self.error = None;
                // A selection made before the list arrived may point nowhere.
                if self.current().is_none() {
                    self.current_channel_id = DEFAULT_CHANNEL_ID;
                }
            }
            Action::ChannelsFailed(error) => {
                self.status = FetchStatus::Failed;
                self.error = Some(error.clone());
            }
            Action::ChannelCreated(channel) => {
                match self.channels.iter_mut().find(|c| c.id == channel.id) {
                    Some(existing) => *existing = channel.clone(),
                    None => self.channels.push(channel.clone()),
                }
                self.current_channel_id = channel.id;
            }
            Action::ChannelRenamed { id, name } => {
                if let Some(channel) = self.channels.iter_mut().find(|c| c.id == *id) {
                    channel.name = name.clone();
                }
            }
            Action::ChannelRemoved(id) => {
                self.channels.retain(|c| c.id != *id);
                if self.current_channel_id == *id {
                    self.current_channel_id = DEFAULT_CHANNEL_ID;
                }
            }
            Action::ChannelSelected(id) => {
                // Before the list has loaded there is nothing to check against.
                if self.status.is_ready() && self.get(*id).is_none() {
                    debug!("Ignoring selection of unknown channel {}", id);
                    return;
                }
                self.current_channel_id = *id;
            }
            Action::ClearChannelError => {
                self.error = None;
            }
            Action::LoggedOut => {
                *self = Self::default();
            }
            _ => {}
        }
    }
}
