//! Topic and post handlers

use axum::{
    extract::{Path, State},
    Json,
};
use forum_core::Snowflake;
use forum_service::dto::{
    ApiResponse, CreatePostRequest, CreateTopicRequest, PostResponse, TopicDetailResponse,
    TopicResponse,
};
use forum_service::TopicService;
use tracing::instrument;

use crate::extractors::{AuthUser, ClientIp, CurrentViewer, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// GET /api/v1/topics/:topic_id
///
/// Topic detail with posts in creation order; each fetch bumps the view
/// counter.
#[instrument(skip(state))]
pub async fn get_topic(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(topic_id): Path<String>,
) -> ApiResult<Json<ApiResponse<TopicDetailResponse>>> {
    let topic_id = parse_topic_id(&topic_id)?;

    let topic = TopicService::new(state.service_context())
        .get_topic(viewer, topic_id)
        .await?;

    Ok(Json(ApiResponse::new(topic)))
}

/// POST /api/v1/forums/:forum_id/topics
#[instrument(skip(state, request))]
pub async fn create_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(forum_id): Path<String>,
    ClientIp(user_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<CreateTopicRequest>,
) -> ApiResult<Created<Json<ApiResponse<TopicResponse>>>> {
    let forum_id = Snowflake::parse(&forum_id)
        .map_err(|_| ApiError::invalid_path("Invalid forum ID format"))?;

    let topic = TopicService::new(state.service_context())
        .create_topic(auth.viewer(), forum_id, request, user_ip)
        .await?;

    Ok(Created(Json(ApiResponse::new(topic))))
}

/// POST /api/v1/topics/:topic_id/posts
#[instrument(skip(state, request))]
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<String>,
    ClientIp(user_ip): ClientIp,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<ApiResponse<PostResponse>>>> {
    let topic_id = parse_topic_id(&topic_id)?;

    let post = TopicService::new(state.service_context())
        .create_post(auth.viewer(), topic_id, request, user_ip)
        .await?;

    Ok(Created(Json(ApiResponse::new(post))))
}

fn parse_topic_id(raw: &str) -> Result<Snowflake, ApiError> {
    Snowflake::parse(raw).map_err(|_| ApiError::invalid_path("Invalid topic ID format"))
}
