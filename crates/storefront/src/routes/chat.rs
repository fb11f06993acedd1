//! Live chat route handlers.
//!
//! Sessions live in memory. Support replies arrive in the background, so
//! clients poll `GET /api/chat/sessions/{id}` to see them.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delta_gear_core::{ChatMessage, ChatSessionId};

use crate::error::{AppError, Result};
use crate::services::{ChatSession, ChatState};
use crate::state::AppState;

/// Chat session snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: ChatSessionId,
    pub state: ChatState,
    pub pending_replies: usize,
    pub messages: Vec<ChatMessage>,
}

impl From<&ChatSession> for SessionResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id(),
            state: session.state(),
            pending_replies: session.pending_replies(),
            messages: session.messages(),
        }
    }
}

/// Visitor message body.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

fn find_session(state: &AppState, id: &str) -> Result<Arc<ChatSession>> {
    id.parse::<ChatSessionId>()
        .ok()
        .and_then(|id| state.chat().get(id))
        .ok_or_else(|| AppError::NotFound(format!("chat session {id}")))
}

/// Open a chat session.
///
/// POST /api/chat/sessions
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.chat().open();
    (
        StatusCode::CREATED,
        Json(SessionResponse::from(session.as_ref())),
    )
}

/// Show a chat session.
///
/// GET /api/chat/sessions/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let session = find_session(&state, &id)?;
    Ok(Json(SessionResponse::from(session.as_ref())))
}

/// Send a visitor message.
///
/// POST /api/chat/sessions/{id}/messages
///
/// Returns the appended message, or 204 when the text is blank.
#[instrument(skip(state, body))]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Response> {
    let session = find_session(&state, &id)?;

    Ok(match session.send(&body.text)? {
        Some(message) => (StatusCode::CREATED, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Close a chat session, cancelling pending replies.
///
/// DELETE /api/chat/sessions/{id}
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let closed = id
        .parse::<ChatSessionId>()
        .is_ok_and(|id| state.chat().close(id));

    if closed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("chat session {id}")))
    }
}
