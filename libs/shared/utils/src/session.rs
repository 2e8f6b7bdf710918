use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use shared_models::auth::Session;

static GLOBAL_SESSION: OnceLock<Arc<SessionStore>> = OnceLock::new();

/// Process-wide key/value store for the signed-in identity.
///
/// The sign-in flow writes it, sign-out clears it, and everything else only
/// reads the bearer token from it.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session; handy for wiring tests.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    pub fn global() -> Arc<SessionStore> {
        GLOBAL_SESSION
            .get_or_init(|| Arc::new(SessionStore::new()))
            .clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current()
            .map(|s| s.token)
            .filter(|t| !t.is_empty())
    }

    pub fn logged_in_user(&self) -> Option<String> {
        self.current().map(|s| s.logged_in_user)
    }

    pub fn user_role(&self) -> Option<String> {
        self.current().map(|s| s.user_role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, session: Session) {
        debug!("Storing session for {}", session.logged_in_user);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn clear(&self) {
        debug!("Clearing session");
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
