use axum::{
    extract::State,
    Extension, Json,
};
use serde::Serialize;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;

use crate::{
    config::Config,
    models::session::Session,
    services::auth as auth_service,
    state::AppState,
};

/// The name of the credential cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// Body returned on a successful logout.
pub const LOGOUT_OK_MESSAGE: &str = "Logged out successfully";
/// Body returned when teardown failed.
pub const LOGOUT_ERROR_MESSAGE: &str = "Error during logout";

/// The response payload for authentication-related requests.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Creates the credential cookie carrying `value`.
///
/// Setting and deleting the cookie both go through here, since a browser
/// only drops a cookie when the deletion repeats its attributes.
pub fn credential_cookie(config: &Config, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, value);

    cookie.set_http_only(true);
    cookie.set_secure(config.secure_cookies());
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(config.session_ttl().num_seconds()));

    cookie
}

/// Creates the cookie that deletes the credential.
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = credential_cookie(config, String::new());
    cookie.make_removal();
    cookie
}

/// Handles user logout.
///
/// Always answers 200. Failures clearing the server session are logged and
/// reported in the body; the cookie is only removed once the session is gone.
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Json<AuthResponse> {
    let token = cookies.get(AUTH_COOKIE).map(|c| c.value().to_string());
    tracing::info!("👋 Logout requested (credential present: {})", token.is_some());

    if let Err(e) = auth_service::end_session(
        state.sessions.as_ref(),
        token.as_deref(),
        state.config.logout_timeout,
    )
    .await
    {
        tracing::error!("❌ Error during logout: {}", e);
        return Json(AuthResponse {
            success: false,
            message: LOGOUT_ERROR_MESSAGE.to_string(),
        });
    }

    cookies.remove(removal_cookie(&state.config));
    tracing::info!("✅ Credential cookie cleared");

    Json(AuthResponse {
        success: true,
        message: LOGOUT_OK_MESSAGE.to_string(),
    })
}

/// The response payload for the liveness check.
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    /// The session store backing the service.
    pub sessions: String,
    /// Whether transactional email is configured.
    pub mailer: bool,
}

/// Returns the session read model for the request's credential.
pub async fn session_status(
    Extension(session): Extension<Session>,
) -> Json<Session> {
    tracing::debug!("Session status: {}", session.status().as_str());
    Json(session)
}

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.sessions.name().to_string(),
        mailer: state.mailer.is_enabled(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_cookie_repeats_set_attributes() {
        let config = Config::default();
        let set = credential_cookie(&config, "token".to_string());
        let removal = removal_cookie(&config);

        assert_eq!(removal.name(), AUTH_COOKIE);
        assert_eq!(removal.value(), "");
        assert_eq!(removal.http_only(), Some(true));
        assert_eq!(removal.path(), Some("/"));
        assert_eq!(removal.http_only(), set.http_only());
        assert_eq!(removal.path(), set.path());
        assert_eq!(removal.secure(), set.secure());
        assert_eq!(removal.same_site(), set.same_site());
        assert_eq!(removal.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn oversized_session_duration_does_not_panic() {
        let config = Config {
            session_duration_days: i64::MAX / 1000,
            ..Config::default()
        };

        let removal = removal_cookie(&config);
        assert_eq!(removal.max_age(), Some(Duration::ZERO));

        let set = credential_cookie(&config, "token".to_string());
        assert_eq!(
            set.max_age(),
            Some(Duration::days(crate::config::MAX_SESSION_DURATION_DAYS))
        );
    }

    #[test]
    fn secure_flag_follows_environment() {
        let development = Config::default();
        assert_eq!(removal_cookie(&development).secure(), Some(false));

        let production = Config {
            environment: "production".to_string(),
            ..Config::default()
        };
        assert_eq!(removal_cookie(&production).secure(), Some(true));
        assert_eq!(credential_cookie(&production, "t".to_string()).secure(), Some(true));
    }
}
