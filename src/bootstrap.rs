//! One-time initialization of an application instance.
//!
//! The client and the server compose the same pieces through two entry
//! points. Both install the state container and the auth handle; only the
//! client restores a persisted session before handing control back.

pub mod auth;
pub mod container;
pub mod registry;

use std::sync::Arc;

use crate::bootstrap::auth::AuthHandle;
use crate::bootstrap::container::AuthStore;
use crate::bootstrap::registry::AppRoot;
use crate::error::StartupError;
use crate::repositories::session::SessionStore;

/// Where an application instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Client,
    Server,
}

/// A bootstrapped client instance.
pub struct ClientApp {
    pub root: AppRoot,
    /// The auth store, already restored.
    pub auth: Arc<AuthStore>,
}

/// Bootstraps a client instance.
///
/// Returns once the persisted `credential` has been resolved, so the first
/// render already sees the restored session.
pub async fn client(
    credential: Option<String>,
    sessions: Option<Arc<dyn SessionStore>>,
) -> Result<ClientApp, StartupError> {
    let mut root = AppRoot::client(credential);

    let container = container::install(&mut root)?;
    auth::install(&mut root, sessions).await?;

    let store = container.auth_store(&root).await?;
    let session = store.init().await;
    tracing::info!("✅ Client hydrated (session: {})", session.status().as_str());

    Ok(ClientApp { root, auth: store })
}

/// Bootstraps the server process.
///
/// Session state on the server is resolved per request, so no store is
/// restored here.
pub async fn server(
    sessions: Option<Arc<dyn SessionStore>>,
) -> Result<(AppRoot, Arc<AuthHandle>), StartupError> {
    let mut root = AppRoot::server();

    container::install(&mut root)?;
    let handle = auth::install(&mut root, sessions).await?;

    Ok((root, handle))
}
