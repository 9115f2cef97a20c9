//! Session lifecycle and state.
//!
//! A session is one simulated brainstorming run: the topic, the
//! partitioned subgroups, the subgroup/persona interaction graph, and a
//! metrics snapshot. All of it lives in memory and belongs to a single
//! [`SessionController`].
//!
//! # State Machine
//!
//! | State           | Description                          | Valid Transitions  |
//! |-----------------|--------------------------------------|--------------------|
//! | `NoSession`     | Process started, nothing built yet   | → SessionActive    |
//! | `SessionActive` | Subgroups, graph, and metrics built  | → SessionActive    |
//!
//! Starting a session while one is active discards the old one entirely.
//! The new session is assembled off to the side and swapped in as a
//! single assignment, so readers never observe a half-built state. There
//! is no teardown state; process exit ends the session.
//!
//! # Usage
//!
//! ```
//! use csi::session::SessionController;
//!
//! let mut controller = SessionController::with_seed(42);
//! controller.start_new_session("How can we make cities more sustainable?", 75)?;
//!
//! let metrics = controller.metrics()?;
//! assert_eq!(metrics.active_participants, 75);
//!
//! let figure = controller.network_figure()?;
//! assert_eq!(figure.node_trace().x.len(), 22);
//! # Ok::<(), csi::CsiError>(())
//! ```

mod graph;
mod metrics;
mod subgroup;

pub use graph::{
    InteractionGraph, NetworkNode, NodeKind, AGENT_NODE_SIZE, MAX_AGENT_LINKS, MIN_AGENT_LINKS,
};
pub use metrics::{MetricsSnapshot, CONSENSUS_RANGE, ENGAGEMENT_RANGE, TOTAL_IDEAS_RANGE};
pub use subgroup::{dropped_count, partition_participants, Subgroup, GROUP_SIZE};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CsiError, Result};
use crate::layout::{spring_layout, NetworkFigure, LAYOUT_ITERATIONS, SPRING_CONSTANT};
use crate::personas::PersonaRegistry;

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session has been started
    NoSession,
    /// A session is built and readable
    SessionActive,
}

/// One simulated brainstorming run
#[derive(Debug)]
pub struct Session {
    /// Session ID
    id: String,
    /// Brainstorming topic
    topic: String,
    /// Requested participant count
    participant_count: u32,
    /// Participants excluded from every subgroup
    dropped_participants: u32,
    /// Partitioned subgroups
    subgroups: Vec<Subgroup>,
    /// Subgroup/persona interaction graph
    graph: InteractionGraph,
    /// Metrics snapshot taken at session start
    metrics: MetricsSnapshot,
    /// When the session was started
    started_at: DateTime<Utc>,
}

impl Session {
    /// Assemble a complete session: partition, link, estimate.
    fn build(
        topic: &str,
        participant_count: u32,
        personas: &PersonaRegistry,
        rng: &mut impl Rng,
    ) -> Self {
        let subgroups = partition_participants(participant_count);
        let dropped = dropped_count(participant_count);
        if dropped > 0 {
            warn!(
                participant_count,
                dropped, "trailing participants do not fill a subgroup and are left out"
            );
        }

        let mut graph = InteractionGraph::new();
        graph.rebuild(&subgroups, personas, rng);

        let metrics = MetricsSnapshot::estimate(participant_count, rng);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            participant_count,
            dropped_participants: dropped,
            subgroups,
            graph,
            metrics,
            started_at: Utc::now(),
        }
    }

    /// Session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Brainstorming topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Requested participant count
    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    /// Participants excluded from every subgroup
    pub fn dropped_participants(&self) -> u32 {
        self.dropped_participants
    }

    /// The partitioned subgroups
    pub fn subgroups(&self) -> &[Subgroup] {
        &self.subgroups
    }

    /// The interaction graph
    pub fn network(&self) -> &InteractionGraph {
        &self.graph
    }

    /// The metrics snapshot taken at session start
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics
    }

    /// When the session was started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Lay out the graph and package it as a renderable figure.
    ///
    /// Layout is stochastic: each call re-runs the force simulation from
    /// fresh random positions unless the RNG is seeded.
    pub fn render_figure(&self, rng: &mut impl Rng) -> NetworkFigure {
        let positions = spring_layout(self.graph.as_graph(), SPRING_CONSTANT, LAYOUT_ITERATIONS, rng);
        NetworkFigure::from_network(&self.graph, &positions)
    }

    /// Summarize the session for status reporting.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            participant_count: self.participant_count,
            dropped_participants: self.dropped_participants,
            subgroup_count: self.subgroups.len(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            metrics: self.metrics,
            started_at: self.started_at,
        }
    }
}

/// Session summary for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Session ID
    pub id: String,
    /// Brainstorming topic
    pub topic: String,
    /// Requested participant count
    pub participant_count: u32,
    /// Participants excluded from every subgroup
    pub dropped_participants: u32,
    /// Number of subgroups
    pub subgroup_count: usize,
    /// Interaction graph node count
    pub node_count: usize,
    /// Interaction graph edge count
    pub edge_count: usize,
    /// Metrics snapshot
    pub metrics: MetricsSnapshot,
    /// When the session was started
    pub started_at: DateTime<Utc>,
}

/// Owns the current session and the random source feeding it.
///
/// All random steps (persona sampling, layout seeding, metric estimation)
/// draw from the controller's RNG, so a controller built with
/// [`SessionController::with_seed`] replays identically.
pub struct SessionController {
    personas: PersonaRegistry,
    session: Option<Session>,
    rng: StdRng,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// Create a controller with the embedded roster and an entropy-seeded RNG
    pub fn new() -> Self {
        Self {
            personas: PersonaRegistry::new(),
            session: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a controller with the embedded roster and a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            personas: PersonaRegistry::new(),
            session: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builder: replace the persona roster
    pub fn with_registry(mut self, personas: PersonaRegistry) -> Self {
        self.personas = personas;
        self
    }

    /// The persona roster in use
    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::SessionActive
        } else {
            SessionState::NoSession
        }
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start a new session, replacing any active one.
    ///
    /// The replacement is all-or-nothing: validation failures leave the
    /// prior session untouched, and the new session only becomes visible
    /// once fully built.
    pub fn start_new_session(&mut self, topic: &str, participant_count: u32) -> Result<&Session> {
        if self.personas.len() < MAX_AGENT_LINKS {
            return Err(CsiError::Validation(format!(
                "persona roster has {} entries, need at least {MAX_AGENT_LINKS} for subgroup linking",
                self.personas.len()
            )));
        }

        let session = Session::build(topic, participant_count, &self.personas, &mut self.rng);
        info!(
            session_id = %session.id(),
            topic,
            participant_count,
            subgroups = session.subgroups().len(),
            "session started"
        );
        Ok(self.session.insert(session))
    }

    /// Current metrics snapshot
    pub fn metrics(&self) -> Result<MetricsSnapshot> {
        self.session
            .as_ref()
            .map(Session::metrics)
            .ok_or(CsiError::SessionNotStarted)
    }

    /// Lay out the active session's graph as a renderable figure
    pub fn network_figure(&mut self) -> Result<NetworkFigure> {
        let session = self.session.as_ref().ok_or(CsiError::SessionNotStarted)?;
        Ok(session.render_figure(&mut self.rng))
    }
}
