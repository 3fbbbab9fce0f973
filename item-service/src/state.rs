//! Application state shared across handlers

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::service::ItemService;

/// Application state shared across handlers
///
/// Cloned per request by axum; every clone shares the same config and store.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    items: ItemService,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, items: ItemService) -> Self {
        Self {
            config: Arc::new(config),
            items,
            started_at: Instant::now(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the item service
    pub fn items(&self) -> &ItemService {
        &self.items
    }

    /// Time since the state was built
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), ItemService::default())
    }
}
