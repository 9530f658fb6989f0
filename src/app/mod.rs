pub mod config;
pub mod router;

use crate::game::registry::PlayerRegistry;
use crate::game::types::WorldMap;
use config::ServerConfig;
use std::sync::Arc;

/// Everything a connection needs, built once at startup.
pub struct AppState {
    pub registry: Arc<PlayerRegistry>,
    pub world: Arc<WorldMap>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(PlayerRegistry::new()),
            world: Arc::new(config.world.clone()),
            config,
        }
    }
}
