use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::bootstrap::ExecutionContext;
use crate::error::StartupError;

/// Name of the session store handle.
pub const AUTH_HANDLE: &str = "auth";
/// Name of the state container handle.
pub const STATE_CONTAINER_HANDLE: &str = "pinia";

/// Named, typed handles published during bootstrap.
#[derive(Default)]
pub struct ServiceRegistry {
    handles: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    /// Publishes `handle` under `name`. Each name can be provided once.
    pub fn provide<T: Any + Send + Sync>(
        &mut self,
        name: &'static str,
        handle: Arc<T>,
    ) -> Result<(), StartupError> {
        if self.handles.contains_key(name) {
            return Err(StartupError::AlreadyInstalled(name));
        }
        self.handles.insert(name, handle);
        tracing::debug!("Provided handle '{}'", name);
        Ok(())
    }

    /// Looks up the handle published under `name`.
    pub fn get<T: Any + Send + Sync>(&self, name: &'static str) -> Result<Arc<T>, StartupError> {
        let handle = self
            .handles
            .get(name)
            .cloned()
            .ok_or(StartupError::MissingHandle(name))?;

        handle
            .downcast::<T>()
            .map_err(|_| StartupError::HandleType(name))
    }

    /// Whether a handle exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }
}

/// The root context of one application instance.
///
/// Holds everything the bootstrap routines publish. There is one per
/// process (server) or per client instance, passed explicitly.
pub struct AppRoot {
    context: ExecutionContext,
    credential: Option<String>,
    registry: ServiceRegistry,
}

impl AppRoot {
    /// A root for a client instance holding a persisted `credential`.
    pub fn client(credential: Option<String>) -> Self {
        Self {
            context: ExecutionContext::Client,
            credential,
            registry: ServiceRegistry::default(),
        }
    }

    /// A root for the server process.
    pub fn server() -> Self {
        Self {
            context: ExecutionContext::Server,
            credential: None,
            registry: ServiceRegistry::default(),
        }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// The persisted credential. Always `None` on the server.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.registry
    }
}
