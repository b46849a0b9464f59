use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderdesk::{
    bootstrap,
    config::Config,
    repositories::{
        memory_session::MemorySessionStore,
        redis_session::RedisSessionStore,
        session::SessionStore,
    },
    routes,
    services::mailer::Mailer,
    state::AppState,
};

/// How often expired in-memory sessions are purged.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG may come from .env, so load it before the subscriber.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully ({})", config.environment);

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(
            RedisSessionStore::connect(url)
                .await
                .context("Failed to connect to the Redis session store")?,
        ),
        None => {
            tracing::warn!("⚠️ REDIS_URL not set, sessions are kept in memory");
            let memory = MemorySessionStore::new();
            let sweeper = memory.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(SESSION_SWEEP_INTERVAL).await;
                    let purged = sweeper.purge_expired().await;
                    tracing::info!("🧹 Purged {} expired sessions", purged);
                }
            });
            Arc::new(memory)
        }
    };

    let (root, _auth) = bootstrap::server(Some(sessions)).await?;

    let mailer = Mailer::bootstrap(&config.mailer);

    let bind_addr = config.bind_addr;
    let state = AppState::from_root(config, &root, mailer)?;
    let app = routes::build(state);

    tracing::info!("🚀 Server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
