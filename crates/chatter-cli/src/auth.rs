use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use tracing::info;

use chatter_client::{ApiClient, ClientError};
use chatter_storage::{SessionRepo, StoredSession};
use chatter_store::{Action, AuthState, validate_signup};
use chatter_types::SessionContext;
use chatter_types::api::AuthResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Signup,
}

/// Run a login or signup against the backend and persist the session it
/// returns. Returns the resulting auth slice so the caller can report it.
pub async fn authenticate(
    api: &ApiClient,
    sessions: &SessionRepo,
    flow: AuthFlow,
    username: &str,
    password: &str,
) -> Result<AuthState> {
    let mut auth = AuthState::default();
    auth.reduce(&Action::AuthStarted);

    let result = match flow {
        AuthFlow::Login => api.login(username, password).await,
        AuthFlow::Signup => api.signup(username, password).await,
    };

    match result {
        Ok(AuthResponse { token, username }) => {
            sessions.save(&StoredSession {
                token: token.clone(),
                username: username.clone(),
            })?;
            auth.reduce(&Action::AuthSucceeded(SessionContext::authorized(username, token)));
        }
        Err(e) => auth.reduce(&Action::AuthFailed(describe_failure(flow, &e))),
    }
    Ok(auth)
}

/// 401 and 409 get their own wording; everything else is reported as is.
pub fn describe_failure(flow: AuthFlow, err: &ClientError) -> String {
    match (flow, err) {
        (AuthFlow::Login, ClientError::Unauthorized) => {
            "authorization failed: wrong username or password".to_string()
        }
        (AuthFlow::Signup, ClientError::Conflict(_)) => "user already exists".to_string(),
        _ => err.to_string(),
    }
}

pub async fn login(
    api: &ApiClient,
    sessions: &SessionRepo,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };
    report(authenticate(api, sessions, AuthFlow::Login, username, &password).await?)
}

pub async fn signup(
    api: &ApiClient,
    sessions: &SessionRepo,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let (password, confirm) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
    };
    validate_signup(username, &password, &confirm)?;
    report(authenticate(api, sessions, AuthFlow::Signup, username.trim(), &password).await?)
}

pub fn logout(sessions: &SessionRepo) -> Result<()> {
    sessions.clear()?;
    info!("Logged out");
    println!("Logged out.");
    Ok(())
}

fn report(auth: AuthState) -> Result<()> {
    if let Some(error) = auth.error {
        bail!(error);
    }
    println!("Logged in as {}.", auth.session.username().unwrap_or_default());
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
