//! Application state.

use std::sync::Arc;

use credit_gate_store::RocksStore;

use crate::config::ServiceConfig;
use crate::guard::AccessGuard;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The access guard over the same store.
    pub guard: AccessGuard,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let guard = AccessGuard::new(store.clone());
        Self {
            store,
            guard,
            config,
        }
    }
}
