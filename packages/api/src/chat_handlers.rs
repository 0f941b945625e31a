// ABOUTME: HTTP handlers for the intake conversation
// ABOUTME: Sends chat turns, exposes the session transcript and checks the model connection

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use intake_ai::ErrorCategory;
use intake_core::{ChatMessage, ConversationSession, ProgressSnapshot, Turn, CONNECTION_PROBE};

use crate::{
    auth::CurrentUser,
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
};

/// Request body for one chat turn
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Assistant reply plus the intake progress after the turn
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub progress: ProgressSnapshot,
}

/// Full transcript and progress of a session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub turns: Vec<Turn>,
    pub progress: ProgressSnapshot,
}

impl From<&ConversationSession> for SessionView {
    fn from(session: &ConversationSession) -> Self {
        Self {
            turns: session.turns().to_vec(),
            progress: session.snapshot(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCategory>,
}

/// Process one user message: extract fields, call the model, record both turns
pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<ChatReply>>> {
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }

    if !state.completion.is_configured() {
        return Err(AppError::MissingApiKey);
    }

    let handle = state.sessions.get_or_create(&user.id).await;
    let mut session = handle.try_lock().map_err(|_| {
        warn!(user_id = %user.id, "Rejected message while a turn is in flight");
        AppError::SessionBusy
    })?;

    let prepared = session.prepare_turn(message);
    let mut next = prepared.session;

    info!(
        user_id = %user.id,
        message_count = prepared.messages.len(),
        "Requesting completion"
    );

    let outcome = state.completion.complete(&prepared.messages).await;

    let reply = match &outcome {
        Ok(reply) => reply.data.clone(),
        // The turn stays in the transcript with the error shown as the reply
        Err(e) => ErrorCategory::from(e).user_message().to_string(),
    };
    next.record_reply(reply.clone());
    let progress = next.snapshot();

    // A reset while the model was answering orphans this handle
    if state.sessions.is_current(&user.id, &handle).await {
        *session = next;
    } else {
        warn!(user_id = %user.id, "Session reset during turn, reply not recorded");
    }

    match outcome {
        Ok(completion) => {
            info!(
                user_id = %user.id,
                completed = progress.completed,
                tokens = completion.usage.total_tokens(),
                "Chat turn completed"
            );

            Ok(Json(ApiResponse::success(ChatReply {
                response: reply,
                progress,
            })))
        }
        Err(e) => Err(AppError::upstream(ErrorCategory::from(&e), e.to_string())),
    }
}

/// Current transcript and progress, opening a session if needed
pub async fn get_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let handle = state.sessions.get_or_create(&user.id).await;
    let session = handle.lock().await;
    Ok(Json(ApiResponse::success(SessionView::from(&*session))))
}

/// Discard the session and start over with the greeting
pub async fn reset_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let existed = state.sessions.reset(&user.id).await;
    info!(user_id = %user.id, existed, "Conversation session reset");

    let handle = state.sessions.get_or_create(&user.id).await;
    let session = handle.lock().await;
    Ok(Json(ApiResponse::success(SessionView::from(&*session))))
}

/// Send a fixed probe prompt and report whether the model answered
pub async fn test_connection(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ApiResponse<ConnectionStatus>>> {
    if !state.completion.is_configured() {
        return Err(AppError::MissingApiKey);
    }

    let model = state.completion.model().to_string();
    let probe = [ChatMessage::user(CONNECTION_PROBE)];

    let status = match state.completion.complete(&probe).await {
        Ok(reply) => ConnectionStatus {
            connected: !reply.data.is_empty(),
            model,
            error: None,
        },
        Err(e) => {
            let category = ErrorCategory::from(&e);
            warn!(user_id = %user.id, error = %e, "Connection test failed");
            ConnectionStatus {
                connected: false,
                model,
                error: Some(category),
            }
        }
    };

    Ok(Json(ApiResponse::success(status)))
}
