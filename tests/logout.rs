mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use orderdesk::{
    config::Config,
    repositories::{memory_session::MemorySessionStore, session::SessionStore},
};

use common::{BrokenClearStore, HungStore, app_with, production};

async fn logout(app: &Router, method: &str, token: Option<&str>) -> Response {
    let mut request = Request::builder().method(method).uri("/api/auth/logout");
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("auth_token={}", token));
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn logout_clears_session_and_cookie() {
    let store = MemorySessionStore::new();
    let (token, _) = store.create(42, chrono::Duration::days(7)).await;
    let app = app_with(Arc::new(store.clone()), Config::default()).await;

    let response = logout(&app, "POST", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    let removal = &cookies[0];
    assert!(removal.starts_with("auth_token=;"), "{removal}");
    assert!(removal.contains("HttpOnly"));
    assert!(removal.contains("Path=/"));
    assert!(removal.contains("Max-Age=0"));
    assert!(!removal.contains("Secure"));

    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "message": "Logged out successfully" })
    );

    assert!(store.is_empty().await);
    let session = store.status(Some(&token)).await.unwrap();
    assert_eq!(session.status().as_str(), "unauthenticated");
}

#[tokio::test]
async fn logout_is_idempotent() {
    let store = MemorySessionStore::new();
    let (token, _) = store.create(42, chrono::Duration::days(7)).await;
    let app = app_with(Arc::new(store), Config::default()).await;

    for _ in 0..2 {
        let response = logout(&app, "POST", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
    }

    let response = logout(&app, "GET", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(json_body(response).await["success"], true);
}

#[tokio::test]
async fn production_removal_cookie_is_secure() {
    let store = MemorySessionStore::new();
    let (token, _) = store.create(1, chrono::Duration::days(1)).await;
    let app = app_with(Arc::new(store), production()).await;

    let response = logout(&app, "GET", Some(&token)).await;
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("Secure"));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("Path=/"));
}

#[tokio::test]
async fn failed_clear_reports_in_body_with_200() {
    let store = Arc::new(BrokenClearStore::default());
    let app = app_with(store.clone(), Config::default()).await;

    let response = logout(&app, "POST", Some("some-token")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Error during logout" })
    );

    let response = logout(&app, "POST", Some("some-token")).await;
    assert_eq!(json_body(response).await["success"], false);
    assert_eq!(store.clears.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn hung_clear_times_out() {
    let config = Config {
        logout_timeout: Duration::from_millis(50),
        ..Config::default()
    };
    let app = app_with(Arc::new(HungStore), config).await;

    let response = logout(&app, "POST", Some("some-token")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "message": "Error during logout" })
    );
}

#[tokio::test]
async fn session_endpoint_reports_status() {
    let store = MemorySessionStore::new();
    let (token, _) = store.create(42, chrono::Duration::days(7)).await;
    let app = app_with(Arc::new(store), Config::default()).await;

    let request = Request::get("/api/auth/session")
        .header(header::COOKIE, format!("auth_token={}", token))
        .body(Body::empty())
        .unwrap();
    let body = json_body(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["userId"], 42);
    assert!(body["expiresAt"].is_string());

    let request = Request::get("/api/auth/session").body(Body::empty()).unwrap();
    let body = json_body(app.oneshot(request).await.unwrap()).await;
    assert_eq!(body, json!({ "status": "unauthenticated" }));
}

#[tokio::test]
async fn health_reports_backends() {
    let app = app_with(Arc::new(MemorySessionStore::new()), Config::default()).await;

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "ok", "sessions": "memory", "mailer": false })
    );
}
