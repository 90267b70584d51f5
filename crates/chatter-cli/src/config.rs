use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::{info, warn};

use chatter_client::{ApiClient, ClientConfig};
use chatter_filter::{Language, ProfanityFilter, dictionary::load_words_file};
use chatter_storage::{Database, SessionRepo, StoredSession};
use chatter_types::SessionContext;

/// Connection and storage settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Chat backend, without the `/api/v1` suffix.
    #[arg(long, global = true, env = "CHATTER_BASE_URL", default_value = "http://127.0.0.1:5001")]
    pub base_url: String,

    /// SQLite file holding the stored session.
    #[arg(long, global = true, env = "CHATTER_DB_PATH", default_value = "chatter.db")]
    pub db_path: PathBuf,

    /// Extra words for the profanity filter, one per line.
    #[arg(long, global = true, env = "CHATTER_PROFANITY_WORDS")]
    pub profanity_words: Option<PathBuf>,
}

impl Config {
    pub fn api_client(&self) -> Result<ApiClient> {
        let config = ClientConfig::new(&self.base_url)?;
        Ok(ApiClient::new(config)?)
    }

    pub fn sessions(&self) -> Result<SessionRepo> {
        let db = Database::open(&self.db_path)
            .with_context(|| format!("opening {}", self.db_path.display()))?;
        Ok(SessionRepo::new(Arc::new(db)))
    }

    /// Built-in dictionaries plus the optional word file.
    pub fn filter(&self) -> Result<ProfanityFilter> {
        let mut filter = ProfanityFilter::default();
        if let Some(path) = &self.profanity_words {
            let words = load_words_file(path)?;
            info!("Loaded {} extra filter words from {}", words.len(), path.display());
            filter.add_words(Language::Custom, words);
        }
        Ok(filter)
    }
}

pub fn load_session(sessions: &SessionRepo) -> Result<SessionContext> {
    Ok(match sessions.load()? {
        Some(StoredSession { token, username }) => SessionContext::authorized(username, token),
        None => SessionContext::anonymous(),
    })
}

/// The stored session, or an error telling the user to log in.
pub fn require_session(sessions: &SessionRepo) -> Result<SessionContext> {
    let session = load_session(sessions)?;
    if !session.is_authorized() {
        warn!("No stored session");
        bail!("not logged in, run `chatter login` first");
    }
    Ok(session)
}
