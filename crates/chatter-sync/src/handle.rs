use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use chatter_client::ApiClient;
use chatter_filter::ProfanityFilter;
use chatter_store::Store;
use chatter_types::{ChannelId, SessionContext};

use crate::command::{Command, Event};
use crate::coordinator::{SyncCoordinator, SyncOptions};
use crate::notice::Stamped;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync coordinator is not running")]
    Stopped,
}

/// The view's side of a running coordinator.
pub struct SyncHandle {
    events: mpsc::UnboundedSender<Event>,
    state: watch::Receiver<Store>,
    notices: broadcast::Sender<Stamped>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    pub(crate) fn new(
        events: mpsc::UnboundedSender<Event>,
        state: watch::Receiver<Store>,
        notices: broadcast::Sender<Stamped>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            state,
            notices,
            task: Some(task),
        }
    }

    /// Build a coordinator for `session` and start it.
    pub fn start(
        api: ApiClient,
        filter: Arc<ProfanityFilter>,
        session: SessionContext,
        options: SyncOptions,
    ) -> Self {
        SyncCoordinator::new(api, filter, session, options).start()
    }

    pub fn send(&self, command: Command) -> Result<(), SyncError> {
        self.events
            .send(Event::Command(command))
            .map_err(|_| SyncError::Stopped)
    }

    pub fn refresh(&self) -> Result<(), SyncError> {
        self.send(Command::Refresh)
    }

    pub fn select_channel(&self, id: ChannelId) -> Result<(), SyncError> {
        self.send(Command::SelectChannel(id))
    }

    pub fn create_channel(&self, name: impl Into<String>) -> Result<(), SyncError> {
        self.send(Command::CreateChannel(name.into()))
    }

    pub fn rename_channel(&self, id: ChannelId, name: impl Into<String>) -> Result<(), SyncError> {
        self.send(Command::RenameChannel {
            id,
            name: name.into(),
        })
    }

    pub fn remove_channel(&self, id: ChannelId) -> Result<(), SyncError> {
        self.send(Command::RemoveChannel(id))
    }

    pub fn send_message(&self, draft: impl Into<String>) -> Result<(), SyncError> {
        self.send(Command::SendMessage(draft.into()))
    }

    pub fn dismiss_errors(&self) -> Result<(), SyncError> {
        self.send(Command::DismissErrors)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> Store {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn watch(&self) -> watch::Receiver<Store> {
        self.state.clone()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Stamped> {
        self.notices.subscribe()
    }

    /// Wait until a snapshot satisfies `pred` and return it.
    pub async fn wait_for<F>(&self, mut pred: F) -> Result<Store, SyncError>
    where
        F: FnMut(&Store) -> bool,
    {
        let mut rx = self.state.clone();
        let store = rx
            .wait_for(|store| pred(store))
            .await
            .map_err(|_| SyncError::Stopped)?;
        Ok(store.clone())
    }

    /// Stop the coordinator and wait for its task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.events.send(Event::Command(Command::Shutdown));
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.events.send(Event::Command(Command::Shutdown));
        }
    }
}
