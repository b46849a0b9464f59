use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authentication status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No valid credential is attached.
    Unauthenticated,
    /// A credential is being resolved.
    Pending,
    /// The credential maps to a live session.
    Authenticated,
}

impl SessionStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Pending => "pending",
            SessionStatus::Authenticated => "authenticated",
        }
    }
}

/// Represents a user session.
///
/// An authenticated session always carries a user id. The fields are private
/// so that the only way to build one is through the constructors below, and
/// deserialization runs through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    status: SessionStatus,
    user_id: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session with no identity attached.
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user_id: None,
            expires_at: None,
        }
    }

    /// A session whose credential is still being resolved.
    pub fn pending() -> Self {
        Self {
            status: SessionStatus::Pending,
            user_id: None,
            expires_at: None,
        }
    }

    /// An authenticated session for `user_id`.
    pub fn authenticated(user_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user_id: Some(user_id),
            expires_at: Some(expires_at),
        }
    }

    /// The status of the session.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The id of the user this session belongs to.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// The timestamp when the session expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the session is authenticated at `now`.
    ///
    /// An authenticated session past its expiry is no longer active.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Authenticated
            && self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

/// The serialized shape of a [`Session`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = String;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        if record.status == SessionStatus::Authenticated && record.user_id.is_none() {
            return Err("authenticated session without userId".to_string());
        }

        Ok(Session {
            status: record.status,
            user_id: record.user_id,
            expires_at: record.expires_at,
        })
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        SessionRecord {
            status: session.status,
            user_id: session.user_id,
            expires_at: session.expires_at,
        }
    }
}
