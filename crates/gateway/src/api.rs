//! JSON API — the gateway's session and chat surface.
//!
//! Endpoints (nested under `/api/v1`):
//!
//! - `POST /chat`                  — Run one turn, get the reply
//! - `GET  /history/{session_id}`  — Rendered history for a session
//! - `POST /clear`                 — Empty a session's history
//! - `POST /view`                  — Toggle readme/chat view
//! - `GET  /status`                — Readiness + active provider
//! - `GET  /readme`                — The embedded README markdown

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use connectsense_core::message::Message;
use connectsense_core::session::{SessionState, View};

use crate::SharedState;

/// Maximum number of in-memory sessions before oldest are evicted.
const MAX_SESSIONS: usize = 1_000;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/api/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/history/{session_id}", get(history_handler))
        .route("/clear", post(clear_handler))
        .route("/view", post(view_handler))
        .route("/status", get(status_handler))
        .route("/readme", get(readme_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    /// Existing session ID (omit to create a new session).
    #[serde(default)]
    session_id: Option<String>,
    /// The user's question.
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    session_id: String,
    reply: String,
    degraded: bool,
}

#[derive(Serialize)]
struct HistoryResponse {
    session_id: String,
    messages: Vec<MessageDto>,
    view: View,
}

#[derive(Serialize)]
struct MessageDto {
    role: String,
    content: String,
    timestamp: String,
}

impl From<&Message> for MessageDto {
    fn from(m: &Message) -> Self {
        Self {
            role: match m.role {
                connectsense_core::message::Role::User => "user".into(),
                connectsense_core::message::Role::Assistant => "assistant".into(),
            },
            content: m.content.clone(),
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Deserialize)]
struct SessionRequest {
    session_id: String,
}

#[derive(Serialize)]
struct ClearResponse {
    session_id: String,
    cleared: bool,
}

#[derive(Serialize)]
struct ViewResponse {
    session_id: String,
    view: View,
}

#[derive(Serialize)]
struct StatusResponse {
    ready: bool,
    provider: &'static str,
    sessions: usize,
    started_at: String,
}

#[derive(Serialize)]
struct ReadmeResponse {
    content: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn not_found(session_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Unknown session: {session_id}"),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    let session_id = payload
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(session = %session_id, "chat request");

    // Take a working copy so the session map isn't locked across the
    // blocking engine call; the turn is written back afterwards.
    let mut session = {
        let mut sessions = state.sessions.write().await;
        evict_if_full(&mut sessions, &session_id);
        sessions
            .entry(session_id.clone())
            .or_insert_with(|| SessionState::new(state.runtime.active_provider()))
            .clone()
    };

    let outcome = state.runtime.run_turn(&mut session, &payload.message).await;

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);

    Ok(Json(ChatResponse {
        session_id,
        reply: outcome.reply,
        degraded: outcome.degraded,
    }))
}

async fn history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&session_id).ok_or_else(|| not_found(&session_id))?;

    Ok(Json(HistoryResponse {
        session_id: session_id.clone(),
        messages: session.messages.iter().map(MessageDto::from).collect(),
        view: session.view,
    }))
}

async fn clear_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<ClearResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&payload.session_id)
        .ok_or_else(|| not_found(&payload.session_id))?;

    session.clear();
    info!(session = %payload.session_id, "history cleared");

    Ok(Json(ClearResponse {
        session_id: payload.session_id,
        cleared: true,
    }))
}

async fn view_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SessionRequest>,
) -> Result<Json<ViewResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    evict_if_full(&mut sessions, &payload.session_id);
    let session = sessions
        .entry(payload.session_id.clone())
        .or_insert_with(|| SessionState::new(state.runtime.active_provider()));

    let view = session.toggle_view();

    Ok(Json(ViewResponse {
        session_id: payload.session_id,
        view,
    }))
}

async fn status_handler(State(state): State<SharedState>) -> Json<StatusResponse> {
    let sessions = state.sessions.read().await;
    Json(StatusResponse {
        ready: !state.runtime.is_degraded(),
        provider: state.runtime.active_provider().label(),
        sessions: sessions.len(),
        started_at: state.start_time.to_rfc3339(),
    })
}

async fn readme_handler(State(state): State<SharedState>) -> Json<ReadmeResponse> {
    Json(ReadmeResponse {
        content: state.readme,
    })
}

/// Evict the oldest-created session when the map is at capacity and the
/// incoming id is new.
fn evict_if_full(
    sessions: &mut std::collections::HashMap<String, SessionState>,
    incoming_id: &str,
) {
    if sessions.len() >= MAX_SESSIONS && !sessions.contains_key(incoming_id) {
        if let Some(oldest_key) = sessions
            .iter()
            .min_by_key(|(_, s)| s.created_at)
            .map(|(k, _)| k.clone())
        {
            sessions.remove(&oldest_key);
        }
    }
}
