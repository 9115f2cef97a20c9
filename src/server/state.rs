//! Server state shared across handlers.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::config::ServerConfig;
use crate::session::SessionController;

/// Application state shared across handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The session controller, exclusive owner of all simulation state.
    ///
    /// A write lock covers both session rebuilds and figure rendering
    /// (the layout draws from the controller's RNG), so readers never
    /// observe a partially-rebuilt session.
    pub controller: RwLock<SessionController>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state around a controller
    pub fn new(config: ServerConfig, controller: SessionController) -> Self {
        Self {
            config,
            controller: RwLock::new(controller),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
