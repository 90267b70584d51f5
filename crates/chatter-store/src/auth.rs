use chatter_types::SessionContext;

use crate::action::Action;
use crate::status::FetchStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: SessionContext,
    pub status: FetchStatus,
    pub error: Option<String>,
}

impl AuthState {
    /// Start from whatever session was persisted last run.
    pub fn restored(session: SessionContext) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.session.is_authorized()
    }

    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::AuthStarted => {
                self.status = FetchStatus::Loading;
                self.error = None;
            }
            Action::AuthSucceeded(session) => {
                self.session = session.clone();
                self.status = FetchStatus::Succeeded;
                self.error = None;
            }
            Action::AuthFailed(error) => {
                self.status = FetchStatus::Failed;
                self.error = Some(error.clone());
            }
            Action::LoggedOut => {
                *self = Self::default();
            }
            _ => {}
        }
    }
}
