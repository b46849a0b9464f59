use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    handlers::auth::AUTH_COOKIE,
    models::session::Session,
    state::AppState,
};

/// Extracts the credential from the request cookies.
fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// A middleware that resolves the request's credential into a [`Session`]
/// request extension.
///
/// Requests without a credential, or with an unknown or expired one, continue
/// with an unauthenticated session. Only a failing backend stops the request.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn resolve_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(&cookies);

    let session = state.sessions.status(token.as_deref()).await?;
    tracing::debug!("🔐 Resolved session: {}", session.status().as_str());

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
