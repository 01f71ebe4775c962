//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use wishlist_proxy_core::ProxySigner;

use crate::config::WishlistConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The pool is opened at startup
/// and handed in here; nothing in the crate keeps a global handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WishlistConfig,
    pool: SqlitePool,
    signer: ProxySigner,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `SQLite` connection pool
    #[must_use]
    pub fn new(config: WishlistConfig, pool: SqlitePool) -> Self {
        let signer = config.proxy.signer();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                signer,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &WishlistConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the App Proxy signer.
    #[must_use]
    pub fn signer(&self) -> &ProxySigner {
        &self.inner.signer
    }
}
