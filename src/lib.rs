//! # CSI Core - Conversational Swarm Intelligence Simulator
//!
//! Simulates a "conversational swarm intelligence" brainstorming session:
//! a pool of participants is partitioned into fixed-size subgroups, each
//! subgroup is linked to a random handful of LLM-backed agent personas,
//! and the resulting interaction graph is served as a force-directed
//! figure alongside a synthetic metrics snapshot.
//!
//! ## Features
//!
//! - **Subgroup partitioning**: deterministic chunking of synthetic
//!   participants into groups of 5
//! - **Interaction graph**: bipartite subgroup/persona network with 2-3
//!   random persona links per subgroup
//! - **Force-directed layout**: Fruchterman-Reingold spring layout
//!   packaged as plotly-style edge and node traces
//! - **Persona roster**: seven configured personas across six LLM
//!   providers, dispatched through one adapter set
//! - **Dashboard API**: Axum HTTP server exposing session, network, and
//!   metrics endpoints
//!
//! ## Architecture
//!
//! ```text
//! start_new_session(topic, count)
//!         |
//!         v
//!   SubgroupPartitioner ──> InteractionGraph::rebuild ──> MetricsSnapshot
//!         |                        |                           |
//!         └────────────────────────┴───────────────────────────┘
//!                                  |
//!                        Session (swapped in atomically)
//!                                  |
//!            GET /network ──> spring_layout ──> NetworkFigure
//!            GET /metrics ──────────────────> MetricsSnapshot
//! ```
//!
//! ### State Machine
//!
//! | State           | Description                         | Valid Transitions |
//! |-----------------|-------------------------------------|-------------------|
//! | `NoSession`     | Process started, nothing built yet  | → SessionActive   |
//! | `SessionActive` | Subgroups, graph, and metrics built | → SessionActive   |
//!
//! Restarting discards the prior session wholesale; there is no teardown
//! state and no persistence.
//!
//! The agent personas are graph nodes only: the simulation flow never
//! calls out to a provider. The adapter layer in [`agents`] is reachable
//! through the explicit `ask` surface of the CLI.
//!
//! ## Quick Start
//!
//! ```
//! use csi::session::SessionController;
//!
//! let mut controller = SessionController::with_seed(42);
//! controller.start_new_session("How can we make cities more sustainable?", 75)?;
//!
//! // 75 participants -> 15 subgroups + 7 personas = 22 nodes
//! let session = controller.session().unwrap();
//! assert_eq!(session.subgroups().len(), 15);
//! assert_eq!(session.network().node_count(), 22);
//!
//! let metrics = controller.metrics()?;
//! assert_eq!(metrics.active_participants, 75);
//!
//! let figure = controller.network_figure()?;
//! assert_eq!(figure.node_trace().text.len(), 22);
//! # Ok::<(), csi::CsiError>(())
//! ```
//!
//! ## Modules
//!
//! - [`session`]: session controller, subgroup partitioning, interaction
//!   graph, metrics estimation
//! - [`layout`]: force-directed layout and renderable figure traces
//! - [`personas`]: persona cards and the embedded roster
//! - [`agents`]: one-shot provider calls on behalf of personas
//! - [`server`]: HTTP dashboard API (Axum-based)
//! - [`config`]: configuration and credential validation
//! - [`error`]: error types and result alias

pub mod agents;
pub mod config;
pub mod error;
pub mod layout;
pub mod personas;
pub mod server;
pub mod session;

// Re-exports for convenience
pub use agents::{AgentContext, AgentRegistry, AgentReply};
pub use config::Config;
pub use error::{CsiError, Result};
pub use layout::{spring_layout, NetworkFigure};
pub use personas::{PersonaCard, PersonaRegistry, Provider};
pub use server::{AppState, ServerConfig};
pub use session::{
    InteractionGraph, MetricsSnapshot, Session, SessionController, SessionState, Subgroup,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
