use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::crypto::token::generate_session_token;
use crate::error::SessionError;
use crate::models::session::Session;
use crate::repositories::session::SessionStore;

/// An in-process session store for development and tests.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    /// Creates a new, empty `MemorySessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authenticated session for `user_id` and returns its token.
    pub async fn create(&self, user_id: i64, ttl: chrono::Duration) -> (String, Session) {
        let token = generate_session_token();
        let session = Session::authenticated(user_id, Utc::now() + ttl);

        self.sessions
            .write()
            .await
            .insert(token.clone(), session.clone());

        tracing::debug!("🔑 Memory session created for user: {}", user_id);
        (token, session)
    }

    /// Drops every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.is_active(now));
        before - sessions.len()
    }

    /// The number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn status(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let Some(token) = token else {
            return Ok(Session::unauthenticated());
        };

        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            Some(session) if session.is_active(Utc::now()) => Ok(session.clone()),
            _ => Ok(Session::unauthenticated()),
        }
    }

    async fn clear(&self, token: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(token).is_some() {
            tracing::debug!("✅ Memory session removed");
        }
        Ok(())
    }
}
