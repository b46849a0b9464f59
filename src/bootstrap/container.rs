use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, OnceCell, RwLock};

use crate::bootstrap::auth::AuthHandle;
use crate::bootstrap::registry::{AUTH_HANDLE, AppRoot, STATE_CONTAINER_HANDLE};
use crate::error::{SessionError, StartupError};
use crate::models::session::{Session, SessionStatus};
use crate::repositories::session::SessionStore;

/// Client-side auth state: the credential and the cached session.
pub struct AuthStore {
    backend: Arc<dyn SessionStore>,
    credential: RwLock<Option<String>>,
    session: RwLock<Session>,
    restored: OnceCell<()>,
    init_calls: AtomicUsize,
}

impl AuthStore {
    /// Creates a store that resolves `credential` through `backend`.
    pub fn new(backend: Arc<dyn SessionStore>, credential: Option<String>) -> Self {
        Self {
            backend,
            credential: RwLock::new(credential),
            session: RwLock::new(Session::unauthenticated()),
            restored: OnceCell::new(),
            init_calls: AtomicUsize::new(0),
        }
    }

    /// Restores the session from the persisted credential.
    ///
    /// Runs the restoration at most once; later calls return the cached
    /// session. A backend failure leaves the store unauthenticated.
    pub async fn init(&self) -> Session {
        self.restored.get_or_init(|| self.restore()).await;
        self.session().await
    }

    async fn restore(&self) {
        self.init_calls.fetch_add(1, Ordering::SeqCst);

        let credential = self.credential.read().await.clone();
        let Some(token) = credential else {
            *self.session.write().await = Session::unauthenticated();
            return;
        };

        *self.session.write().await = Session::pending();

        let restored = match self.backend.status(Some(&token)).await {
            Ok(session) => {
                if session.status() == SessionStatus::Unauthenticated {
                    tracing::debug!("Persisted credential no longer valid, dropping it");
                    *self.credential.write().await = None;
                }
                session
            }
            Err(e) => {
                // The credential may still be live on the server; keep it so
                // logout can clear it.
                tracing::warn!("⚠️ Could not restore session: {}", e);
                Session::unauthenticated()
            }
        };

        *self.session.write().await = restored;
    }

    /// The cached session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.status() == SessionStatus::Authenticated
    }

    /// The number of times restoration actually ran.
    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Ends the session on the backend and forgets the credential.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let token = self.credential.read().await.clone();
        if let Some(token) = token {
            self.backend.clear(&token).await?;
        }

        *self.credential.write().await = None;
        *self.session.write().await = Session::unauthenticated();
        Ok(())
    }
}

/// The global state container. Stores are built through it, once each.
#[derive(Default)]
pub struct StateContainer {
    auth: Mutex<Option<Arc<AuthStore>>>,
}

impl StateContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the auth store, building it on first use.
    ///
    /// Requires the auth handle to be installed in `root`.
    pub async fn auth_store(&self, root: &AppRoot) -> Result<Arc<AuthStore>, StartupError> {
        let mut slot = self.auth.lock().await;
        if let Some(store) = slot.as_ref() {
            return Ok(store.clone());
        }

        let handle = root.registry().get::<AuthHandle>(AUTH_HANDLE)?;
        let store = Arc::new(AuthStore::new(
            handle.store(),
            root.credential().map(str::to_string),
        ));
        *slot = Some(store.clone());
        Ok(store)
    }

    /// The auth store if it has been built.
    pub async fn built_auth_store(&self) -> Option<Arc<AuthStore>> {
        self.auth.lock().await.clone()
    }
}

/// Creates the state container and installs it into `root`.
pub fn install(root: &mut AppRoot) -> Result<Arc<StateContainer>, StartupError> {
    let container = Arc::new(StateContainer::new());
    root.registry_mut()
        .provide(STATE_CONTAINER_HANDLE, container.clone())?;

    tracing::info!("✅ State container installed");
    Ok(container)
}
