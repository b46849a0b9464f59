use async_trait::async_trait;
use reqwest::header::COOKIE;
use serde::Deserialize;

use crate::error::SessionError;
use crate::handlers::auth::AUTH_COOKIE;
use crate::models::session::Session;
use crate::repositories::session::SessionStore;

#[derive(Deserialize)]
struct LogoutBody {
    success: bool,
    message: String,
}

/// The client-side view of the session API.
///
/// Used by the client bootstrap to restore a persisted session; every call
/// carries the credential as the `auth_token` cookie.
#[derive(Clone)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSessionClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn cookie_header(token: &str) -> String {
        format!("{}={}", AUTH_COOKIE, token)
    }
}

#[async_trait]
impl SessionStore for HttpSessionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn ping(&self) -> Result<(), SessionError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::Connection(format!(
                "health check returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn status(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let Some(token) = token else {
            return Ok(Session::unauthenticated());
        };

        let session = self
            .http
            .get(format!("{}/api/auth/session", self.base_url))
            .header(COOKIE, Self::cookie_header(token))
            .send()
            .await?
            .error_for_status()?
            .json::<Session>()
            .await?;

        Ok(session)
    }

    async fn clear(&self, token: &str) -> Result<(), SessionError> {
        let body = self
            .http
            .post(format!("{}/api/auth/logout", self.base_url))
            .header(COOKIE, Self::cookie_header(token))
            .send()
            .await?
            .error_for_status()?
            .json::<LogoutBody>()
            .await?;

        if !body.success {
            return Err(SessionError::Rejected(body.message));
        }
        Ok(())
    }
}
