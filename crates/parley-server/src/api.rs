//! API handlers for the Parley server.
//!
//! The call endpoints are the "external agent runtime" from the demo's
//! point of view: the orchestrator opens a call, invokes tools one
//! conversational turn at a time, and closes the call when the room
//! empties.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_agent::dispatch::{dispatch, BotSession};
use parley_types::BotKind;
use parley_voice::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Request body for opening a call.
#[derive(Debug, Deserialize)]
pub struct OpenCallRequest {
    /// Which demo bot to talk to: `narrator` or `fraud_desk`.
    pub bot: String,
}

/// Voice-room coordinates for a call, present when LiveKit is configured.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomInfo {
    pub name: String,
    pub url: String,
    #[serde(rename = "callerToken")]
    pub caller_token: String,
}

/// Response body for a successfully opened call.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenCallResponse {
    #[serde(rename = "callId")]
    pub call_id: Uuid,
    pub bot: BotKind,
    /// The line the agent speaks first.
    #[serde(rename = "openingLine")]
    pub opening_line: String,
    /// Room coordinates, or `null` when voice transport is disabled.
    pub room: Option<RoomInfo>,
}

/// Response body for tool invocations and call closes: the single
/// free-text channel the orchestrator consumes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolReply {
    pub message: String,
}

/// Response body for persona lookup.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub agent: &'static parley_agent::AgentDefinition,
    pub pipeline: PipelineConfig,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn parse_bot(slug: &str) -> Result<BotKind, ApiError> {
    BotKind::from_slug(slug)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown bot: {slug}")))
}

/// Handler for `GET /api/agents/{bot}`.
///
/// Returns the persona (instructions + tool schemas) and the pipeline
/// configuration the external platform should run the agent with.
pub async fn get_agent_handler(
    Path(bot): Path<String>,
) -> Result<Json<AgentResponse>, ApiError> {
    let bot = parse_bot(&bot)?;
    Ok(Json(AgentResponse {
        agent: parley_agent::definition(bot),
        pipeline: PipelineConfig::default(),
    }))
}

/// Handler for `POST /api/calls`.
pub async fn open_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<OpenCallRequest>,
) -> Result<Json<OpenCallResponse>, ApiError> {
    let bot = parse_bot(&payload.bot)?;
    let call_id = Uuid::new_v4();

    // Room setup happens before the session is registered so the lock is
    // never held across an await.
    let room = if state.broker.is_enabled() {
        match state.broker.open_call(bot, &call_id.to_string()).await {
            Ok(ticket) => Some(RoomInfo {
                name: ticket.room_name,
                url: ticket.url,
                caller_token: ticket.caller_token,
            }),
            Err(e) => {
                tracing::warn!(bot = %bot, "voice room setup failed, continuing without: {e}");
                None
            }
        }
    } else {
        None
    };

    let mut session = match bot {
        BotKind::Narrator => BotSession::narrator(state.save_dir.clone()),
        BotKind::FraudDesk => {
            BotSession::fraud_desk(state.directory.clone(), state.store.clone())
        }
    };
    let opening_line = session.opening_line();

    state
        .sessions
        .lock()
        .map_err(|_| ApiError::InternalServerError("session registry poisoned".to_string()))?
        .insert(call_id, session);

    tracing::info!(call_id = %call_id, bot = %bot, "call opened");

    Ok(Json(OpenCallResponse {
        call_id,
        bot,
        opening_line,
        room,
    }))
}

/// Handler for `POST /api/calls/{callId}/tools/{tool}`.
///
/// The request body is forwarded to the tool as-is; an empty body is a
/// tool invocation with no arguments.
pub async fn invoke_tool_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((call_id, tool)): Path<(Uuid, String)>,
    body: Option<Json<serde_json::Value>>,
) -> Result<Json<ToolReply>, ApiError> {
    let args = body.map(|Json(v)| v).unwrap_or(serde_json::Value::Null);

    // Tool dispatch can hit SQLite, so it runs on the blocking pool.
    let message = tokio::task::spawn_blocking(move || {
        let mut sessions = state
            .sessions
            .lock()
            .map_err(|_| ApiError::InternalServerError("session registry poisoned".to_string()))?;
        let session = sessions
            .get_mut(&call_id)
            .ok_or_else(|| ApiError::NotFound(format!("no open call {call_id}")))?;
        Ok::<_, ApiError>(dispatch(session, &tool, &args))
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("dispatch task failed: {e}")))??;

    Ok(Json(ToolReply { message }))
}

/// Handler for `DELETE /api/calls/{callId}`.
///
/// Ends the session, removes it from the registry, and returns the
/// closing line. The room, if any, is left to LiveKit's empty-room
/// timeout.
pub async fn close_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(call_id): Path<Uuid>,
) -> Result<Json<ToolReply>, ApiError> {
    let message = tokio::task::spawn_blocking(move || {
        let mut sessions = state
            .sessions
            .lock()
            .map_err(|_| ApiError::InternalServerError("session registry poisoned".to_string()))?;
        let mut session = sessions
            .remove(&call_id)
            .ok_or_else(|| ApiError::NotFound(format!("no open call {call_id}")))?;
        tracing::info!(call_id = %call_id, "call closed");
        Ok::<_, ApiError>(session.close())
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("close task failed: {e}")))??;

    Ok(Json(ToolReply { message }))
}
