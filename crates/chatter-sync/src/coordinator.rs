use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use chatter_client::{ApiClient, PushHandle, PushSignal};
use chatter_filter::ProfanityFilter;
use chatter_store::{
    Action, Store, validate_channel_name, validate_channel_removal, validate_channel_rename,
    validate_message_draft,
};
use chatter_types::api::NewMessageRequest;
use chatter_types::{PushEvent, SessionContext};

use crate::command::{Command, Completion, Event};
use crate::handle::SyncHandle;
use crate::notice::{Notice, Stamped};

const NOTICE_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Subscribe to the push feed on start. One-shot listings turn this off.
    pub push: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { push: true }
    }
}

pub struct SyncCoordinator {
    api: ApiClient,
    filter: Arc<ProfanityFilter>,
    options: SyncOptions,
    store: Store,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    state_tx: watch::Sender<Store>,
    notices_tx: broadcast::Sender<Stamped>,
    /// Raised while handling the current event; sent after its snapshot.
    pending: Vec<Notice>,
    push: Option<PushHandle>,
}

impl SyncCoordinator {
    pub fn new(
        api: ApiClient,
        filter: Arc<ProfanityFilter>,
        session: SessionContext,
        options: SyncOptions,
    ) -> Self {
        let store = Store::new(session);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(store.clone());
        let (notices_tx, _) = broadcast::channel(NOTICE_BUFFER);

        Self {
            api,
            filter,
            options,
            store,
            events_tx,
            events_rx,
            state_tx,
            notices_tx,
            pending: Vec::new(),
            push: None,
        }
    }

    /// Subscribe before `start` to see notices raised during activation.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Stamped> {
        self.notices_tx.subscribe()
    }

    /// Spawn the coordinator task.
    pub fn start(self) -> SyncHandle {
        let events_tx = self.events_tx.clone();
        let state_rx = self.state_tx.subscribe();
        let notices_tx = self.notices_tx.clone();
        let task = tokio::spawn(self.run());
        SyncHandle::new(events_tx, state_rx, notices_tx, task)
    }

    async fn run(mut self) {
        self.activate().await;

        while let Some(event) = self.events_rx.recv().await {
            if matches!(event, Event::Command(Command::Shutdown)) {
                break;
            }
            self.handle_event(event);
            self.publish();
        }

        // Dropping the handle tears down the push subscription.
        self.push = None;
        info!("Sync coordinator stopped");
    }

    async fn activate(&mut self) {
        // Subscribe before fetching so nothing posted in between is missed;
        // overlap with the fetched history is deduplicated by id.
        if self.options.push {
            let subscribed = chatter_client::subscribe(
                self.api.config(),
                self.store.session(),
                self.events_tx.clone(),
            )
            .await;
            match subscribed {
                Ok(handle) => self.push = Some(handle),
                Err(e) => {
                    warn!("Push feed unavailable: {}", e);
                    self.notify(Notice::from_failure(&e, |reason| {
                        Notice::PushDisconnected { reason }
                    }));
                }
            }
        }

        self.refresh();
        self.publish();
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Command(command) => self.handle_command(command),
            Event::Completed(completion) => self.handle_completion(completion),
            Event::Push(signal) => self.handle_push(signal),
        }
    }

    fn handle_command(&mut self, command: Command) {
        debug!("Command: {:?}", command);
        match command {
            Command::Refresh => self.refresh(),

            Command::SelectChannel(id) => self.store.reduce(&Action::ChannelSelected(id)),

            Command::CreateChannel(name) => {
                let name = match validate_channel_name(&name, &self.store.channels) {
                    Ok(name) => self.filter.clean(name),
                    Err(e) => return self.notify(Notice::Invalid(e)),
                };
                let (api, session) = self.request_context();
                self.spawn_request(async move {
                    Completion::ChannelCreated(api.create_channel(&session, &name).await)
                });
            }

            Command::RenameChannel { id, name } => {
                let name = match validate_channel_rename(id, &name, &self.store.channels) {
                    Ok(name) => self.filter.clean(name),
                    Err(e) => return self.notify(Notice::Invalid(e)),
                };
                let (api, session) = self.request_context();
                self.spawn_request(async move {
                    Completion::ChannelRenamed {
                        id,
                        result: api.rename_channel(&session, id, &name).await,
                    }
                });
            }

            Command::RemoveChannel(id) => {
                if let Err(e) = validate_channel_removal(id, &self.store.channels) {
                    return self.notify(Notice::Invalid(e));
                }
                let (api, session) = self.request_context();
                self.spawn_request(async move {
                    Completion::ChannelRemoved {
                        id,
                        result: api.remove_channel(&session, id).await,
                    }
                });
            }

            Command::SendMessage(draft) => {
                let validated = validate_message_draft(&draft, self.store.session()).map(
                    |(body, username)| NewMessageRequest {
                        body: self.filter.clean(body),
                        channel_id: self.store.channels.current_channel_id,
                        username: username.to_string(),
                    },
                );
                let request = match validated {
                    Ok(request) => request,
                    Err(e) => return self.notify(Notice::Invalid(e)),
                };
                let (api, session) = self.request_context();
                self.spawn_request(async move {
                    Completion::MessageSent(api.send_message(&session, &request).await)
                });
            }

            Command::DismissErrors => {
                self.store.reduce(&Action::ClearChannelError);
                self.store.reduce(&Action::ClearMessageError);
            }

            // Intercepted by the run loop.
            Command::Shutdown => {}
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Channels(Ok(channels)) => {
                self.store.reduce(&Action::ChannelsLoaded(channels));
            }
            Completion::Channels(Err(e)) => {
                warn!("Channel fetch failed: {}", e);
                self.store.reduce(&Action::ChannelsFailed(e.to_string()));
                self.notify(Notice::from_failure(&e, |reason| Notice::FetchFailed { reason }));
            }
            Completion::Messages(Ok(messages)) => {
                self.store.reduce(&Action::MessagesLoaded(messages));
            }
            Completion::Messages(Err(e)) => {
                warn!("Message fetch failed: {}", e);
                self.store.reduce(&Action::MessagesFailed(e.to_string()));
                self.notify(Notice::from_failure(&e, |reason| Notice::FetchFailed { reason }));
            }

            Completion::ChannelCreated(Ok(channel)) => {
                info!("Channel {} (#{}) created", channel.id, channel.name);
                let name = channel.name.clone();
                self.store.reduce(&Action::ChannelCreated(channel));
                self.notify(Notice::ChannelCreated { name });
            }
            Completion::ChannelCreated(Err(e)) => {
                warn!("Channel create failed: {}", e);
                self.notify(Notice::from_failure(&e, |reason| Notice::ChannelNotCreated { reason }));
            }

            Completion::ChannelRenamed { id, result: Ok(channel) } => {
                info!("Channel {} renamed to #{}", id, channel.name);
                let name = channel.name;
                self.store.reduce(&Action::ChannelRenamed {
                    id,
                    name: name.clone(),
                });
                self.notify(Notice::ChannelRenamed { name });
            }
            Completion::ChannelRenamed { id, result: Err(e) } => {
                warn!("Channel {} rename failed: {}", id, e);
                self.notify(Notice::from_failure(&e, |reason| Notice::ChannelNotRenamed { reason }));
            }

            Completion::ChannelRemoved { id, result: Ok(()) } => {
                info!("Channel {} removed", id);
                self.store.reduce(&Action::ChannelRemoved(id));
                self.notify(Notice::ChannelRemoved);
            }
            Completion::ChannelRemoved { id, result: Err(e) } => {
                warn!("Channel {} remove failed: {}", id, e);
                self.notify(Notice::from_failure(&e, |reason| Notice::ChannelNotRemoved { reason }));
            }

            Completion::MessageSent(Ok(message)) => {
                self.store.reduce(&Action::MessageReceived(message));
            }
            Completion::MessageSent(Err(e)) => {
                warn!("Message send failed: {}", e);
                self.notify(Notice::from_failure(&e, |reason| Notice::MessageNotSent { reason }));
            }
        }
    }

    fn handle_push(&mut self, signal: PushSignal) {
        match signal {
            PushSignal::Event(PushEvent::NewMessage(message)) => {
                self.store.reduce(&Action::MessageReceived(message));
            }
            PushSignal::Disconnected { reason } => {
                self.push = None;
                self.notify(Notice::PushDisconnected { reason });
            }
        }
    }

    fn refresh(&mut self) {
        self.store.reduce(&Action::ChannelsLoading);
        self.store.reduce(&Action::MessagesLoading);

        let (api, session) = self.request_context();
        self.spawn_request(async move { Completion::Channels(api.fetch_channels(&session).await) });

        let (api, session) = self.request_context();
        self.spawn_request(async move { Completion::Messages(api.fetch_messages(&session).await) });
    }

    fn request_context(&self) -> (ApiClient, SessionContext) {
        (self.api.clone(), self.store.session().clone())
    }

    /// Run a request off the coordinator task; its completion re-enters the
    /// queue. In-flight requests are never cancelled.
    fn spawn_request<F>(&self, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let completion = request.await;
            let _ = events_tx.send(Event::Completed(completion));
        });
    }

    fn notify(&mut self, notice: Notice) {
        debug!("Notice: {}", notice);
        self.pending.push(notice);
    }

    /// Publish the snapshot first so a notice never arrives ahead of the state
    /// it describes.
    fn publish(&mut self) {
        self.state_tx.send_replace(self.store.clone());
        for notice in self.pending.drain(..) {
            // No subscribers is fine.
            let _ = self.notices_tx.send(Stamped::now(notice));
        }
    }
}
