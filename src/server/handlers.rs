//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::error::CsiError;
use crate::session::{SessionState, SessionSummary};

/// Create the dashboard API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let logging = state.config.logging;
    let cors = state.config.cors_enabled;

    let mut router = Router::new()
        // Health and status
        .route("/health", get(health_check))
        .route("/status", get(status))
        // Session operations
        .route("/session", post(start_session))
        .route("/network", get(network))
        .route("/metrics", get(metrics))
        .with_state(state);

    if logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

/// Map a core error onto a status code and an error-shaped JSON body.
fn error_response(err: &CsiError) -> Response {
    let status = match err {
        CsiError::Validation(_) => StatusCode::BAD_REQUEST,
        CsiError::SessionNotStarted => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub session_state: SessionState,
    pub persona_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSummary>,
}

/// Status endpoint
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = state.controller.read().await;

    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime().as_secs(),
        session_state: controller.state(),
        persona_count: controller.personas().len(),
        session: controller.session().map(|s| s.summary()),
    })
}

/// Session start request
#[derive(Deserialize)]
pub struct StartSessionRequest {
    pub topic: String,
    /// Signed on the wire so a negative count is rejected with a
    /// validation error instead of a deserialization failure.
    pub participant_count: i64,
}

/// Start a new session, replacing any active one
async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    let participant_count = match u32::try_from(req.participant_count) {
        Ok(count) => count,
        Err(_) => {
            return error_response(&CsiError::Validation(format!(
                "participant_count must be between 0 and {}, got {}",
                u32::MAX,
                req.participant_count
            )));
        },
    };

    let mut controller = state.controller.write().await;
    match controller.start_new_session(&req.topic, participant_count) {
        Ok(session) => (StatusCode::CREATED, Json(session.summary())).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Current network figure for the active session.
///
/// Needs the write lock: each call re-runs the stochastic layout and
/// advances the controller's RNG.
async fn network(State(state): State<Arc<AppState>>) -> Response {
    let mut controller = state.controller.write().await;
    match controller.network_figure() {
        Ok(figure) => (StatusCode::OK, Json(figure)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Current metrics snapshot for the active session
async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let controller = state.controller.read().await;
    match controller.metrics() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(&e),
    }
}
