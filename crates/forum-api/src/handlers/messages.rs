//! Private messaging handlers

use axum::{
    extract::{Path, State},
    Json,
};
use forum_core::Snowflake;
use forum_service::dto::{
    ApiResponse, ConversationResponse, InboxResponse, MessageResponse, SendMessageRequest,
};
use forum_service::MessagingService;
use tracing::instrument;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /api/v1/messages/inbox
#[instrument(skip(state))]
pub async fn get_inbox(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<InboxResponse>>> {
    let inbox = MessagingService::new(state.service_context())
        .inbox(auth.viewer())
        .await?;

    Ok(Json(ApiResponse::new(inbox)))
}

/// POST /api/v1/messages
///
/// Sends a new message when `parent_id` is absent, a reply when present.
#[instrument(skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<ApiResponse<MessageResponse>>>> {
    let message = MessagingService::new(state.service_context())
        .send_message(auth.viewer(), request)
        .await?;

    Ok(Created(Json(ApiResponse::new(message))))
}

/// POST /api/v1/messages/:message_id/read
#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<NoContent> {
    let message_id = Snowflake::parse(&message_id)
        .map_err(|_| ApiError::invalid_path("Invalid message ID format"))?;

    MessagingService::new(state.service_context())
        .mark_read(auth.viewer(), message_id)
        .await?;

    Ok(NoContent)
}

/// GET /api/v1/messages/conversations/:conversation_id
#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ConversationResponse>>> {
    let conversation_id: i64 = conversation_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid conversation ID format"))?;

    let conversation = MessagingService::new(state.service_context())
        .conversation(auth.viewer(), conversation_id)
        .await?;

    Ok(Json(ApiResponse::new(conversation)))
}
