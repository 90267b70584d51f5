//! In-process chat backend for coordinator tests.
//!
//! Serves the `/api/v1` routes and the `/socket` push feed on an ephemeral
//! port, counts mutating requests and lets tests inject raw push frames.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State, WebSocketUpgrade,
        ws::{Message as WsMessage, WebSocket},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::json;
use tokio::sync::broadcast;

use chatter_types::api::{NewChannelRequest, NewMessageRequest, RenameChannelRequest};
use chatter_types::{Channel, ChannelId, Message, SessionContext};

pub const TOKEN: &str = "good-token";
pub const USERNAME: &str = "alice";

#[derive(Default)]
struct Data {
    channels: Vec<Channel>,
    messages: Vec<Message>,
    next_channel_id: ChannelId,
    next_message_id: u64,
    last_body: Option<String>,
}

struct Inner {
    data: Mutex<Data>,
    mutations: AtomicUsize,
    fail_next: AtomicBool,
    push_clients: AtomicUsize,
    push: broadcast::Sender<String>,
}

impl Inner {
    /// Counts a mutating request and decides how it starts: `Some` is the
    /// response to send instead of doing the work.
    fn begin_mutation(&self, headers: &HeaderMap) -> Option<Response> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        if !authorized(headers) {
            return Some(unauthorized());
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Some(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "database is locked" })),
                )
                    .into_response(),
            );
        }
        None
    }
}

#[derive(Clone)]
pub struct Backend {
    inner: Arc<Inner>,
    pub addr: SocketAddr,
}

pub fn channel(id: ChannelId, name: &str, removable: bool) -> Channel {
    Channel {
        id,
        name: name.to_string(),
        removable,
    }
}

pub fn message(id: u64, channel_id: ChannelId, body: &str) -> Message {
    Message {
        id,
        channel_id,
        username: "bob".to_string(),
        body: body.to_string(),
    }
}

pub fn new_message_frame(message: &Message) -> String {
    json!({ "type": "newMessage", "data": message }).to_string()
}

pub fn session() -> SessionContext {
    SessionContext::authorized(USERNAME, TOKEN)
}

impl Backend {
    /// Seeded with `general` (not removable) and `random`, one message each.
    pub async fn start() -> Self {
        Self::start_with(
            vec![channel(1, "general", false), channel(2, "random", true)],
            vec![message(1, 1, "welcome"), message(2, 2, "hi from random")],
        )
        .await
    }

    pub async fn start_with(channels: Vec<Channel>, messages: Vec<Message>) -> Self {
        let next_channel_id = channels.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let next_message_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let (push, _) = broadcast::channel(64);

        let inner = Arc::new(Inner {
            data: Mutex::new(Data {
                channels,
                messages,
                next_channel_id,
                next_message_id,
                last_body: None,
            }),
            mutations: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            push_clients: AtomicUsize::new(0),
            push,
        });

        let app = Router::new()
            .route("/api/v1/channels", get(list_channels).post(create_channel))
            .route(
                "/api/v1/channels/{id}",
                patch(rename_channel).delete(remove_channel),
            )
            .route("/api/v1/messages", get(list_messages).post(create_message))
            .route("/socket", get(socket))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { inner, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST, PATCH and DELETE requests received so far.
    pub fn mutations(&self) -> usize {
        self.inner.mutations.load(Ordering::SeqCst)
    }

    /// Answer the next POST, PATCH or DELETE with a 500 and change nothing.
    pub fn fail_next_mutation(&self) {
        self.inner.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn last_body(&self) -> Option<String> {
        self.inner.data.lock().unwrap().last_body.clone()
    }

    pub fn push_raw(&self, frame: impl Into<String>) {
        let _ = self.inner.push.send(frame.into());
    }

    pub async fn wait_for_push_client(&self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.inner.push_clients.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("push client never connected");
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid token" }))).into_response()
}

async fn list_channels(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = inner.data.lock().unwrap();
    Json(data.channels.clone()).into_response()
}

async fn create_channel(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Json(body): Json<NewChannelRequest>,
) -> Response {
    if let Some(response) = inner.begin_mutation(&headers) {
        return response;
    }
    let mut data = inner.data.lock().unwrap();
    let created = channel(data.next_channel_id, &body.name, true);
    data.next_channel_id += 1;
    data.channels.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn rename_channel(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Path(id): Path<ChannelId>,
    Json(body): Json<RenameChannelRequest>,
) -> Response {
    if let Some(response) = inner.begin_mutation(&headers) {
        return response;
    }
    let mut data = inner.data.lock().unwrap();
    match data.channels.iter_mut().find(|c| c.id == id) {
        Some(existing) => {
            existing.name = body.name;
            Json(existing.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove_channel(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Path(id): Path<ChannelId>,
) -> Response {
    if let Some(response) = inner.begin_mutation(&headers) {
        return response;
    }
    let mut data = inner.data.lock().unwrap();
    let removable = data.channels.iter().find(|c| c.id == id).map(|c| c.removable);
    match removable {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(false) => {
            (StatusCode::FORBIDDEN, Json(json!({ "error": "channel is protected" }))).into_response()
        }
        Some(true) => {
            data.channels.retain(|c| c.id != id);
            data.messages.retain(|m| m.channel_id != id);
            Json(json!({ "id": id })).into_response()
        }
    }
}

async fn list_messages(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = inner.data.lock().unwrap();
    Json(data.messages.clone()).into_response()
}

/// Stores the message, echoes it on the push feed and returns it.
async fn create_message(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Json(body): Json<NewMessageRequest>,
) -> Response {
    if let Some(response) = inner.begin_mutation(&headers) {
        return response;
    }
    let created = {
        let mut data = inner.data.lock().unwrap();
        let created = Message {
            id: data.next_message_id,
            channel_id: body.channel_id,
            username: body.username,
            body: body.body.clone(),
        };
        data.next_message_id += 1;
        data.last_body = Some(body.body);
        data.messages.push(created.clone());
        created
    };
    let _ = inner.push.send(new_message_frame(&created));
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn socket(
    State(inner): State<Arc<Inner>>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if params.get("token").map(String::as_str) != Some(TOKEN) {
        return unauthorized();
    }
    ws.on_upgrade(move |socket| feed(socket, inner))
}

async fn feed(mut socket: WebSocket, inner: Arc<Inner>) {
    let mut rx = inner.push.subscribe();
    inner.push_clients.fetch_add(1, Ordering::SeqCst);
    while let Ok(frame) = rx.recv().await {
        if socket.send(WsMessage::Text(frame.into())).await.is_err() {
            break;
        }
    }
}

/// A TCP endpoint that accepts connections and never says anything.
pub async fn silent_listener() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}
