use std::time::Duration;

use thiserror::Error;

/// Broad failure category, used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong credentials or an expired token.
    Auth,
    /// The resource already exists (signup with a taken username).
    Conflict,
    /// Any other 4xx, or a request the client refused to build.
    Client,
    Server,
    /// Connection refused, reset, DNS, TLS.
    Network,
    /// The server answered with something that did not parse.
    Decode,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("not logged in")]
    MissingToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("push feed connect failed: {0}")]
    PushConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("push feed did not answer within {0:?}")]
    PushTimeout(Duration),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBaseUrl(_) | Self::MissingToken => ErrorKind::Client,
            Self::Unauthorized => ErrorKind::Auth,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Status { status, .. } => classify_http_status(*status),
            Self::Http(e) if e.is_decode() => ErrorKind::Decode,
            Self::Http(e) => match e.status() {
                Some(status) => classify_http_status(status.as_u16()),
                None => ErrorKind::Network,
            },
            Self::PushConnect(_) | Self::PushTimeout(_) => ErrorKind::Network,
        }
    }

    /// The server refused the bearer token (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub fn classify_http_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Auth,
        409 => ErrorKind::Conflict,
        400..=499 => ErrorKind::Client,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Network,
    }
}
