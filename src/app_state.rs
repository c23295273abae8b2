//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::service::RelayHub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay hub owning the connection registry.
    pub hub: Arc<RelayHub>,
    /// Configuration the process was started with.
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Builds the state for `config` with a fresh, empty hub.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            hub: Arc::new(RelayHub::new(config.outbound_buffer)),
            config: Arc::new(config),
        }
    }
}
