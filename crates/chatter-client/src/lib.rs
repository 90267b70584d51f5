//! Network side of the chatter client: the REST API and the push feed.
//!
//! Both take the caller's `SessionContext` explicitly; nothing here reads
//! persisted state.

pub mod config;
pub mod error;
pub mod push;
pub mod rest;

pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind, classify_http_status};
pub use push::{PushHandle, PushSignal, subscribe};
pub use rest::ApiClient;
