//! Gateway state
//!
//! Application state for the gateway server.

use ovation_common::AppConfig;
use ovation_engine::RoomHub;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// The aggregation and fan-out hub
    hub: Arc<RoomHub>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(hub: Arc<RoomHub>, config: AppConfig) -> Self {
        Self {
            hub,
            config: Arc::new(config),
        }
    }

    /// Get the room hub
    pub fn hub(&self) -> &RoomHub {
        &self.hub
    }

    /// Get a shared handle to the room hub
    pub fn hub_handle(&self) -> Arc<RoomHub> {
        self.hub.clone()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("hub", &self.hub)
            .field("config", &"AppConfig")
            .finish()
    }
}
