use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, trace, warn};

use chatter_types::{PushEvent, SessionContext};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// What the push reader hands to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushSignal {
    Event(PushEvent),
    /// The feed ended. No reconnect is attempted.
    Disconnected { reason: String },
}

/// Owns the reader task. Dropping the handle tears the subscription down.
#[derive(Debug)]
pub struct PushHandle {
    task: JoinHandle<()>,
}

impl PushHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn close(self) {
        self.task.abort();
    }
}

impl Drop for PushHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Connect to the push feed and forward every decoded event into `tx` in
/// arrival order. Frames of unknown type are skipped, malformed ones logged.
pub async fn subscribe<E>(
    config: &ClientConfig,
    session: &SessionContext,
    tx: mpsc::UnboundedSender<E>,
) -> Result<PushHandle, ClientError>
where
    E: From<PushSignal> + Send + 'static,
{
    let token = session.token().ok_or(ClientError::MissingToken)?;
    let url = config.push_url(token)?;

    // connect_async has no deadline of its own.
    let (mut stream, _) = tokio::time::timeout(config.connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| ClientError::PushTimeout(config.connect_timeout))?
        .map_err(|e| ClientError::PushConnect(Box::new(e)))?;

    info!("Push feed connected to {}", config.base_url());

    let task = tokio::spawn(async move {
        let reason = loop {
            let msg = match stream.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => break format!("read failed: {e}"),
                None => break "stream ended".to_string(),
            };

            match msg {
                WsMessage::Text(text) => match PushEvent::decode(&text) {
                    Ok(Some(event)) => {
                        debug!("Push event for channel {}", event.channel_id());
                        if tx.send(PushSignal::Event(event).into()).is_err() {
                            // Consumer is gone; nothing left to do.
                            return;
                        }
                    }
                    Ok(None) => trace!("Skipping push frame of unknown type"),
                    Err(e) => {
                        let raw: String = text.chars().take(200).collect();
                        warn!("Bad push frame: {} -- raw: {}", e, raw);
                    }
                },
                WsMessage::Close(frame) => {
                    break frame
                        .map(|f| format!("closed by server: {}", f.reason.as_str()))
                        .unwrap_or_else(|| "closed by server".to_string());
                }
                _ => {}
            }
        };

        info!("Push feed disconnected: {}", reason);
        let _ = tx.send(PushSignal::Disconnected { reason }.into());
    });

    Ok(PushHandle { task })
}
