use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::crypto::token::generate_session_token;
use crate::error::SessionError;
use crate::models::session::Session;
use crate::repositories::session::{SessionStore, session_key};

/// A session store backed by Redis.
///
/// Sessions are stored as JSON under `session:{token}` with a TTL matching
/// the session lifetime.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    /// Connects to the Redis server at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        tracing::info!("✅ Redis Connection Manager initialized (pooled)");
        Ok(Self { redis })
    }

    /// Creates an authenticated session for `user_id` and returns its token.
    pub async fn create(
        &self,
        user_id: i64,
        ttl: chrono::Duration,
    ) -> Result<(String, Session), SessionError> {
        let token = generate_session_token();
        let session = Session::authenticated(user_id, Utc::now() + ttl);

        let session_json = sonic_rs::to_string(&session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        let expiration_seconds = ttl.num_seconds().max(1) as u64;
        let _: () = self
            .redis
            .clone()
            .set_ex(session_key(&token), &session_json, expiration_seconds)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                SessionError::Redis(e)
            })?;

        tracing::info!("✅ Session saved to Redis for user: {}", user_id);
        Ok((token, session))
    }
}

/// Decodes a stored session, treating corrupt or expired entries as
/// unauthenticated.
fn decode_session(session_json: &str, now: DateTime<Utc>) -> Session {
    let session: Session = match sonic_rs::from_str(session_json) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("❌ Invalid session JSON: {}", e);
            return Session::unauthenticated();
        }
    };

    if !session.is_active(now) {
        tracing::debug!("Session expired for user: {:?}", session.user_id());
        return Session::unauthenticated();
    }

    session
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn ping(&self) -> Result<(), SessionError> {
        let _: String = redis::cmd("PING")
            .query_async(&mut self.redis.clone())
            .await?;
        Ok(())
    }

    async fn status(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let Some(token) = token else {
            return Ok(Session::unauthenticated());
        };

        let session_json: Option<String> = self.redis.clone().get(session_key(token)).await?;

        let Some(session_json) = session_json else {
            tracing::debug!("Session not found in Redis");
            return Ok(Session::unauthenticated());
        };

        Ok(decode_session(&session_json, Utc::now()))
    }

    async fn clear(&self, token: &str) -> Result<(), SessionError> {
        let removed: i64 = self.redis.clone().del(session_key(token)).await?;
        tracing::debug!("Session keys removed from Redis: {}", removed);
        Ok(())
    }
}
