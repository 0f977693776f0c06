//! Parley server library logic.

pub mod api;
pub mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use parley_agent::dispatch::BotSession;
use parley_fraud::{CaseRecord, CaseStore};
use parley_voice::RoomBroker;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// Maximum request body size (64 KiB). Tool arguments are small JSON
/// objects; anything larger is not a legitimate request.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fraud cases loaded at startup; read-only for the process lifetime.
    pub directory: Arc<Vec<CaseRecord>>,
    /// Persistence for case outcomes.
    pub store: Arc<dyn CaseStore>,
    /// LiveKit room and token brokerage.
    pub broker: Arc<RoomBroker>,
    /// Live call sessions, one per open call.
    ///
    /// Uses `std::sync::Mutex` intentionally: dispatch is synchronous and
    /// lock acquisitions never span `.await` points.
    pub sessions: Arc<Mutex<HashMap<Uuid, BotSession>>>,
    /// Directory narrator game saves are written to.
    pub save_dir: PathBuf,
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by monitoring
/// and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/agents/{bot}", get(api::get_agent_handler))
        .route("/api/calls", post(api::open_call_handler))
        .route(
            "/api/calls/{callId}/tools/{tool}",
            post(api::invoke_tool_handler),
        )
        .route("/api/calls/{callId}", delete(api::close_call_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
