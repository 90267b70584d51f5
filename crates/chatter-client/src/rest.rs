use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use chatter_types::api::{
    AuthResponse, Credentials, ErrorBody, NewChannelRequest, NewMessageRequest,
    RenameChannelRequest,
};
use chatter_types::{Channel, ChannelId, Message, SessionContext};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Thin typed wrapper over the `/api/v1` routes. Cheap to clone; clones share
/// one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- Auth --

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.post_credentials("login", username, password).await?;
        info!("Logged in as {}", auth.username);
        Ok(auth)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.post_credentials("signup", username, password).await?;
        info!("Signed up as {}", auth.username);
        Ok(auth)
    }

    async fn post_credentials(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.config.api_url(path)?).json(&body);
        decode(request.send().await?).await
    }

    // -- Channels --

    pub async fn fetch_channels(&self, session: &SessionContext) -> Result<Vec<Channel>, ClientError> {
        let request = self.authed(session, self.http.get(self.config.api_url("channels")?))?;
        let channels: Vec<Channel> = decode(request.send().await?).await?;
        debug!("Fetched {} channels", channels.len());
        Ok(channels)
    }

    pub async fn create_channel(
        &self,
        session: &SessionContext,
        name: &str,
    ) -> Result<Channel, ClientError> {
        let body = NewChannelRequest {
            name: name.to_string(),
        };
        let request = self.authed(session, self.http.post(self.config.api_url("channels")?))?;
        decode(request.json(&body).send().await?).await
    }

    pub async fn rename_channel(
        &self,
        session: &SessionContext,
        id: ChannelId,
        name: &str,
    ) -> Result<Channel, ClientError> {
        let body = RenameChannelRequest {
            name: name.to_string(),
        };
        let url = self.config.api_url(&format!("channels/{id}"))?;
        let request = self.authed(session, self.http.patch(url))?;
        decode(request.json(&body).send().await?).await
    }

    /// The response body is not needed; only the status matters.
    pub async fn remove_channel(&self, session: &SessionContext, id: ChannelId) -> Result<(), ClientError> {
        let url = self.config.api_url(&format!("channels/{id}"))?;
        let request = self.authed(session, self.http.delete(url))?;
        check(request.send().await?).await?;
        Ok(())
    }

    // -- Messages --

    pub async fn fetch_messages(&self, session: &SessionContext) -> Result<Vec<Message>, ClientError> {
        let request = self.authed(session, self.http.get(self.config.api_url("messages")?))?;
        let messages: Vec<Message> = decode(request.send().await?).await?;
        debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }

    pub async fn send_message(
        &self,
        session: &SessionContext,
        message: &NewMessageRequest,
    ) -> Result<Message, ClientError> {
        let request = self.authed(session, self.http.post(self.config.api_url("messages")?))?;
        decode(request.json(message).send().await?).await
    }

    fn authed(&self, session: &SessionContext, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = session.token().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }
}

/// Turn a non-2xx response into a `ClientError`, keeping the server's own
/// message when it sent one.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.text().map(str::to_string),
        Err(_) => None,
    }
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    warn!("{} {} failed: {}", status.as_u16(), url, message);

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}
