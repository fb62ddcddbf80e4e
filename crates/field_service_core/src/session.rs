//! crates/field_service_core/src/session.rs
//!
//! The signed-in session: bearer token plus current user, kept in memory for
//! per-request reads and mirrored to persistent storage on every change.

use crate::domain::{PersistedSession, User};
use crate::ports::{PortError, PortResult, SessionStorage, TokenProvider};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<PersistedSession>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(PersistedSession::default()),
        }
    }

    /// Loads whatever the previous run persisted. Unreadable state is logged
    /// and treated as signed out.
    pub async fn restore(&self) -> PersistedSession {
        let restored = match self.storage.load().await {
            Ok(Some(session)) => session,
            Ok(None) => PersistedSession::default(),
            Err(e) => {
                warn!("Could not restore session, starting signed out: {}", e);
                PersistedSession::default()
            }
        };
        self.set(restored.clone());
        restored
    }

    pub async fn login(&self, token: impl Into<String>, user: User) -> PortResult<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(PortError::Validation("token is required".to_string()));
        }
        let session = PersistedSession {
            token: Some(token),
            current_user: Some(user),
        };
        self.storage.save(&session).await?;
        if let Some(user) = &session.current_user {
            info!("Signed in as {}", user.email);
        }
        self.set(session);
        Ok(())
    }

    pub async fn logout(&self) -> PortResult<()> {
        self.storage.clear().await?;
        self.set(PersistedSession::default());
        info!("Signed out");
        Ok(())
    }

    /// Replaces the stored profile of the signed-in user.
    pub async fn update_profile(&self, user: User) -> PortResult<()> {
        let mut session = self.snapshot();
        if session.token.is_none() {
            return Err(PortError::Validation("no user is signed in".to_string()));
        }
        session.current_user = Some(user);
        self.storage.save(&session).await?;
        self.set(session);
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token
    }

    pub fn current_user(&self) -> Option<User> {
        self.snapshot().current_user
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn snapshot(&self) -> PersistedSession {
        self.current
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn set(&self, session: PersistedSession) {
        if let Ok(mut current) = self.current.write() {
            *current = session;
        }
    }
}

impl TokenProvider for SessionManager {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}
