use std::sync::Arc;

use crate::bootstrap::ExecutionContext;
use crate::bootstrap::registry::{AUTH_HANDLE, AppRoot};
use crate::error::StartupError;
use crate::models::session::Session;
use crate::repositories::session::SessionStore;

/// The handle published under [`AUTH_HANDLE`].
pub struct AuthHandle {
    store: Arc<dyn SessionStore>,
    startup_status: Session,
}

impl AuthHandle {
    /// The session store.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }

    /// The session status read when the handle was installed.
    pub fn startup_status(&self) -> &Session {
        &self.startup_status
    }
}

/// Installs the auth handle into `root`.
///
/// Pings the store, reads the current session status and publishes the
/// store. A missing or unreachable store is fatal. On the client the status
/// is also logged; nothing is written.
///
/// # Arguments
///
/// * `root` - The application root.
/// * `sessions` - The session store, if one was configured.
///
/// # Returns
///
/// The published handle.
pub async fn install(
    root: &mut AppRoot,
    sessions: Option<Arc<dyn SessionStore>>,
) -> Result<Arc<AuthHandle>, StartupError> {
    if root.registry().contains(AUTH_HANDLE) {
        return Err(StartupError::AlreadyInstalled(AUTH_HANDLE));
    }

    let store = sessions.ok_or_else(|| {
        StartupError::SessionSubsystemUnavailable("no session store configured".to_string())
    })?;

    store.ping().await.map_err(|e| {
        tracing::error!("❌ Session store '{}' unreachable: {}", store.name(), e);
        StartupError::SessionSubsystemUnavailable(e.to_string())
    })?;

    let startup_status = store
        .status(root.credential())
        .await
        .map_err(|e| StartupError::SessionSubsystemUnavailable(e.to_string()))?;

    if root.context() == ExecutionContext::Client {
        tracing::debug!("Auth status: {}", startup_status.status().as_str());
    }

    let handle = Arc::new(AuthHandle {
        store,
        startup_status,
    });
    root.registry_mut().provide(AUTH_HANDLE, handle.clone())?;

    tracing::info!("✅ Auth handle installed ({} store)", handle.store.name());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::repositories::memory_session::MemorySessionStore;
    use async_trait::async_trait;

    struct DownStore;

    #[async_trait]
    impl SessionStore for DownStore {
        fn name(&self) -> &str {
            "down"
        }

        async fn ping(&self) -> Result<(), SessionError> {
            Err(SessionError::Connection("connection refused".to_string()))
        }

        async fn status(&self, _token: Option<&str>) -> Result<Session, SessionError> {
            Err(SessionError::Connection("connection refused".to_string()))
        }

        async fn clear(&self, _token: &str) -> Result<(), SessionError> {
            Err(SessionError::Connection("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn missing_store_is_fatal() {
        let mut root = AppRoot::server();
        let err = install(&mut root, None).await.err().unwrap();
        assert!(matches!(err, StartupError::SessionSubsystemUnavailable(_)));
        assert!(!root.registry().contains(AUTH_HANDLE));
    }

    #[tokio::test]
    async fn unreachable_store_is_fatal() {
        let mut root = AppRoot::server();
        let err = install(&mut root, Some(Arc::new(DownStore))).await.err().unwrap();
        assert!(matches!(err, StartupError::SessionSubsystemUnavailable(_)));
    }

    #[tokio::test]
    async fn installs_once() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let mut root = AppRoot::server();

        let handle = install(&mut root, Some(store.clone())).await.unwrap();
        assert_eq!(handle.startup_status(), &Session::unauthenticated());
        assert!(root.registry().get::<AuthHandle>(AUTH_HANDLE).is_ok());

        let err = install(&mut root, Some(store)).await.err().unwrap();
        assert!(matches!(err, StartupError::AlreadyInstalled(AUTH_HANDLE)));
    }

    #[tokio::test]
    async fn client_reads_status_for_its_credential() {
        let store = MemorySessionStore::new();
        let (token, _) = store.create(42, chrono::Duration::hours(1)).await;

        let mut root = AppRoot::client(Some(token));
        let handle = install(&mut root, Some(Arc::new(store.clone()))).await.unwrap();

        assert_eq!(handle.startup_status().user_id(), Some(42));
        assert_eq!(store.len().await, 1);
    }
}
