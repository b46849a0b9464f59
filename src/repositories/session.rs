use async_trait::async_trait;

use crate::error::SessionError;
use crate::models::session::Session;

/// Redis key prefix for stored sessions.
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Builds the storage key for a session token.
pub fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token)
}

/// Read/write access to session state.
///
/// Server-side stores resolve tokens against their own storage; the client
/// implementation resolves them through the HTTP API. Every consumer holds an
/// `Arc<dyn SessionStore>`, so the two sides share one interface.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// A short name for logs.
    fn name(&self) -> &str;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), SessionError>;

    /// Resolves the session for `token`.
    ///
    /// This is a pure read. A missing, unknown or expired token yields an
    /// unauthenticated session rather than an error.
    async fn status(&self, token: Option<&str>) -> Result<Session, SessionError>;

    /// Removes the session for `token`. Clearing an unknown token is a no-op.
    async fn clear(&self, token: &str) -> Result<(), SessionError>;
}
