//! Dashboard HTTP server.
//!
//! Serves the simulation over a small JSON API:
//! - `POST /session` starts a new session (full rebuild)
//! - `GET /network` returns the renderable interaction-graph figure
//! - `GET /metrics` returns the current metrics snapshot
//! - `GET /health` and `GET /status` for operators
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use csi::server::{create_router, AppState, ServerConfig};
//! use csi::session::SessionController;
//!
//! let config = ServerConfig::default().with_port(8501);
//! let state = Arc::new(AppState::new(config, SessionController::new()));
//! let app = create_router(state);
//! ```

mod config;
mod handlers;
mod state;

pub use config::ServerConfig;
pub use handlers::{create_router, health_check};
pub use state::AppState;
