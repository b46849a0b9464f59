use std::sync::Arc;

use crate::bootstrap::auth::AuthHandle;
use crate::bootstrap::registry::{AUTH_HANDLE, AppRoot};
use crate::config::Config;
use crate::error::StartupError;
use crate::repositories::session::SessionStore;
use crate::services::mailer::Mailer;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The session store published by the auth bootstrap.
    pub sessions: Arc<dyn SessionStore>,
    /// The application's configuration.
    pub config: Config,
    /// The transactional email plugin.
    pub mailer: Mailer,
}

impl AppState {
    /// Creates a new `AppState` from a bootstrapped root.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    /// * `root` - The root the server bootstrap populated.
    /// * `mailer` - The email plugin.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn from_root(config: Config, root: &AppRoot, mailer: Mailer) -> Result<Self, StartupError> {
        let auth = root.registry().get::<AuthHandle>(AUTH_HANDLE)?;
        tracing::info!("✅ AppState initialized with {} session store", auth.store().name());

        Ok(AppState {
            sessions: auth.store(),
            config,
            mailer,
        })
    }
}
