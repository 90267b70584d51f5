mod auth;
mod chat;
mod config;
mod logging;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use chatter_sync::{SyncCoordinator, SyncOptions};

use crate::config::{Config, load_session, require_session};

const LISTING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "chatter", version, about = "Terminal client for a channel-based group chat")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Log in and store the session.
    Login {
        #[arg(long, short)]
        username: String,
        /// Prompted for when omitted.
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Create an account and store the session.
    Signup {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show whether a session is stored.
    Status,
    /// Fetch and print the channel list.
    Channels,
    /// Interactive chat.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    logging::init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Cmd::Login { username, password } => {
            let api = config.api_client()?;
            auth::login(&api, &config.sessions()?, &username, password).await
        }
        Cmd::Signup { username, password } => {
            let api = config.api_client()?;
            auth::signup(&api, &config.sessions()?, &username, password).await
        }
        Cmd::Logout => auth::logout(&config.sessions()?),
        Cmd::Status => status(&config),
        Cmd::Channels => channels(&config).await,
        Cmd::Chat => chat(&config).await,
    }
}

fn status(config: &Config) -> Result<()> {
    let session = load_session(&config.sessions()?)?;
    match session.username() {
        Some(username) if session.is_authorized() => {
            println!("Logged in as {username} ({})", config.base_url)
        }
        _ => println!("Not logged in"),
    }
    Ok(())
}

async fn channels(config: &Config) -> Result<()> {
    let session = require_session(&config.sessions()?)?;
    let coordinator = SyncCoordinator::new(
        config.api_client()?,
        Arc::new(config.filter()?),
        session,
        SyncOptions { push: false },
    );
    let handle = coordinator.start();

    let store = tokio::time::timeout(
        LISTING_TIMEOUT,
        handle.wait_for(|s| s.channels.status.is_settled() && s.messages.status.is_settled()),
    )
    .await
    .context("timed out waiting for the backend")??;
    handle.shutdown().await;

    if let Some(error) = store.fetch_error() {
        bail!("{error}");
    }
    for channel in &store.channels.channels {
        let count = store.messages.count_in_channel(channel.id);
        println!("{:>3} #{:<20} {count} messages", channel.id, channel.name);
    }
    Ok(())
}

async fn chat(config: &Config) -> Result<()> {
    let session = require_session(&config.sessions()?)?;
    info!(
        "Starting chat as {} against {}",
        session.username().unwrap_or_default(),
        config.base_url
    );

    let coordinator = SyncCoordinator::new(
        config.api_client()?,
        Arc::new(config.filter()?),
        session,
        SyncOptions::default(),
    );
    let notices = coordinator.subscribe_notices();
    chat::run(coordinator.start(), notices).await
}
