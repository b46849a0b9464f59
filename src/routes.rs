use std::time::Duration;

use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
};
use http::{Method, header};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the CORS layer from the configured origins.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
pub fn build(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/api/auth/session", get(handlers::auth::session_status))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::resolve_session,
        ))
        .with_state(state.clone());

    let auth_routes = Router::new()
        .route(
            "/api/auth/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(handlers::auth::health))
        .with_state(state.clone());

    Router::new()
        .merge(health_routes)
        .merge(session_routes)
        .merge(auth_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state))
}
