use std::time::Duration;

use url::Url;

use crate::error::ClientError;

const API_PREFIX: &str = "api/v1/";
const PUSH_PATH: &str = "socket";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` is relative to `/api/v1/`, e.g. `channels/3`.
    pub fn api_url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(API_PREFIX)
            .and_then(|api| api.join(path))
            .map_err(|_| ClientError::InvalidBaseUrl(format!("{}{}{}", self.base_url, API_PREFIX, path)))
    }

    /// WebSocket URL of the push feed, with the token as a query parameter.
    pub fn push_url(&self, token: &str) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(PUSH_PATH)
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?;

        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?;
        url.query_pairs_mut().append_pair("token", token);

        Ok(url)
    }
}
