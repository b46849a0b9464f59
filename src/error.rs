use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised by a session backend.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// An HTTP error talking to a remote session endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend did not answer in time.
    #[error("Session backend timed out after {0} ms")]
    Timeout(u128),

    /// A stored session could not be encoded or decoded.
    #[error("Session serialization failed: {0}")]
    Serialization(String),

    /// The remote endpoint answered but reported a failure.
    #[error("Session backend rejected the request: {0}")]
    Rejected(String),
}

/// Errors that abort application startup.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The session subsystem is missing or unreachable.
    #[error("Session subsystem unavailable: {0}")]
    SessionSubsystemUnavailable(String),

    /// A handle was provided twice.
    #[error("Handle '{0}' is already installed")]
    AlreadyInstalled(&'static str),

    /// A handle was looked up before it was provided.
    #[error("Handle '{0}' has not been provided")]
    MissingHandle(&'static str),

    /// A handle exists under the name but with another type.
    #[error("Handle '{0}' has an unexpected type")]
    HandleType(&'static str),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A session backend error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Session(SessionError::Timeout(ms)) => {
                tracing::error!("Session backend timed out after {} ms", ms);
                (StatusCode::SERVICE_UNAVAILABLE, "Session backend unavailable".to_string())
            }

            AppError::Session(ref e) => {
                tracing::error!("Session error: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "Session backend unavailable".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
