//! Forum handlers

use axum::{
    extract::{Path, State},
    Json,
};
use forum_core::Snowflake;
use forum_service::dto::{
    ApiResponse, CreateForumRequest, ForumDetailResponse, ForumNodeResponse, ForumResponse,
    MoveForumRequest,
};
use forum_service::ForumService;
use tracing::instrument;

use crate::extractors::{AuthUser, CurrentViewer, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// GET /api/v1/forums
///
/// Board index: the viewer's permitted forum tree, three levels deep.
#[instrument(skip(state))]
pub async fn list_forums(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> ApiResult<Json<ApiResponse<Vec<ForumNodeResponse>>>> {
    let forums = ForumService::new(state.service_context())
        .list_forums(viewer)
        .await?;

    Ok(Json(ApiResponse::new(forums)))
}

/// POST /api/v1/forums
#[instrument(skip(state, request))]
pub async fn create_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateForumRequest>,
) -> ApiResult<Created<Json<ApiResponse<ForumResponse>>>> {
    let forum = ForumService::new(state.service_context())
        .create_forum(auth.viewer(), request)
        .await?;

    Ok(Created(Json(ApiResponse::new(forum))))
}

/// GET /api/v1/forums/:forum_id
#[instrument(skip(state))]
pub async fn get_forum(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(forum_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ForumDetailResponse>>> {
    let forum_id = parse_forum_id(&forum_id)?;

    let forum = ForumService::new(state.service_context())
        .get_forum(viewer, forum_id)
        .await?;

    Ok(Json(ApiResponse::new(forum)))
}

/// PATCH /api/v1/forums/:forum_id/parent
#[instrument(skip(state, request))]
pub async fn move_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(forum_id): Path<String>,
    Json(request): Json<MoveForumRequest>,
) -> ApiResult<Json<ApiResponse<ForumResponse>>> {
    let forum_id = parse_forum_id(&forum_id)?;

    let forum = ForumService::new(state.service_context())
        .move_forum(auth.viewer(), forum_id, request)
        .await?;

    Ok(Json(ApiResponse::new(forum)))
}

fn parse_forum_id(raw: &str) -> Result<Snowflake, ApiError> {
    Snowflake::parse(raw).map_err(|_| ApiError::invalid_path("Invalid forum ID format"))
}
