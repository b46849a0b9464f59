#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use orderdesk::{
    bootstrap,
    config::{Config, MailerConfig},
    error::SessionError,
    models::session::Session,
    repositories::session::SessionStore,
    routes,
    services::mailer::Mailer,
    state::AppState,
};

/// Builds the router around `sessions`, going through the server bootstrap.
pub async fn app_with(sessions: Arc<dyn SessionStore>, config: Config) -> Router {
    let (root, _) = bootstrap::server(Some(sessions)).await.unwrap();
    let mailer = Mailer::bootstrap(&MailerConfig::default());
    let state = AppState::from_root(config, &root, mailer).unwrap();
    routes::build(state)
}

/// Serves the router on an ephemeral port and returns its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn production() -> Config {
    Config {
        environment: "production".to_string(),
        ..Config::default()
    }
}

/// A store whose clear always fails with a connection error.
#[derive(Default)]
pub struct BrokenClearStore {
    pub clears: AtomicUsize,
}

#[async_trait]
impl SessionStore for BrokenClearStore {
    fn name(&self) -> &str {
        "broken-clear"
    }

    async fn ping(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn status(&self, _token: Option<&str>) -> Result<Session, SessionError> {
        Ok(Session::unauthenticated())
    }

    async fn clear(&self, _token: &str) -> Result<(), SessionError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Err(SessionError::Connection("connection refused".to_string()))
    }
}

/// A store whose clear never completes in time.
pub struct HungStore;

#[async_trait]
impl SessionStore for HungStore {
    fn name(&self) -> &str {
        "hung"
    }

    async fn ping(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn status(&self, _token: Option<&str>) -> Result<Session, SessionError> {
        Ok(Session::unauthenticated())
    }

    async fn clear(&self, _token: &str) -> Result<(), SessionError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}
