/// Who is logged in, passed explicitly to everything that talks to the
/// backend. Login and signup produce one; logout replaces it with
/// `SessionContext::anonymous()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authorized(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            token: Some(token.into()),
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
