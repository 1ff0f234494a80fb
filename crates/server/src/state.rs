//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::session::SessionManager;
use crate::store::{RestAuthClient, RestStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the backend clients and the session manager.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: RestStore,
    sessions: SessionManager<RestAuthClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Constructs the backend clients from the configuration and starts
    /// the session manager's resolver task.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let store = RestStore::new(&config.store_url, &config.store_api_key);
        let auth = Arc::new(RestAuthClient::new(
            &config.store_url,
            &config.store_api_key,
        ));
        let sessions = SessionManager::new(auth, Arc::new(store.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                sessions,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the backend data client.
    #[must_use]
    pub fn store(&self) -> &RestStore {
        &self.inner.store
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub fn sessions(&self) -> &SessionManager<RestAuthClient> {
        &self.inner.sessions
    }
}
