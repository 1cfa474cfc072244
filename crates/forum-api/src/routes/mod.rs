//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{forums, health, messages, topics};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(forum_routes())
        .merge(topic_routes())
        .merge(message_routes())
}

/// Forum routes
fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/forums", get(forums::list_forums))
        .route("/forums", post(forums::create_forum))
        .route("/forums/:forum_id", get(forums::get_forum))
        .route("/forums/:forum_id/parent", patch(forums::move_forum))
        .route("/forums/:forum_id/topics", post(topics::create_topic))
}

/// Topic routes
fn topic_routes() -> Router<AppState> {
    Router::new()
        .route("/topics/:topic_id", get(topics::get_topic))
        .route("/topics/:topic_id/posts", post(topics::create_post))
}

/// Private message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(messages::send_message))
        .route("/messages/inbox", get(messages::get_inbox))
        .route("/messages/:message_id/read", post(messages::mark_read))
        .route(
            "/messages/conversations/:conversation_id",
            get(messages::get_conversation),
        )
}
