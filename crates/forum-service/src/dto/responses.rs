//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs (and the random conversation id) are serialized as strings
//! for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Forum Responses
// ============================================================================

/// Basic forum response
#[derive(Debug, Clone, Serialize)]
pub struct ForumResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub depth: i16,
    pub has_subforums: bool,
    pub post_count: i64,
    pub topic_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_id: Option<String>,
    pub updated: DateTime<Utc>,
}

/// Forum with its nested child subtrees
#[derive(Debug, Clone, Serialize)]
pub struct ForumNodeResponse {
    #[serde(flatten)]
    pub forum: ForumResponse,
    pub children: Vec<ForumNodeResponse>,
}

/// Forum detail: the forum, its topics, and the permitted subforum tree
#[derive(Debug, Serialize)]
pub struct ForumDetailResponse {
    #[serde(flatten)]
    pub forum: ForumResponse,
    pub topics: Vec<TopicResponse>,
    pub subforums: Vec<ForumNodeResponse>,
}

// ============================================================================
// Topic / Post Responses
// ============================================================================

/// Basic topic response
#[derive(Debug, Clone, Serialize)]
pub struct TopicResponse {
    pub id: String,
    pub forum_id: String,
    pub subject: String,
    pub author_id: String,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub views: i32,
    pub post_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_id: Option<String>,
}

/// Topic detail: the topic plus its posts in creation order
#[derive(Debug, Serialize)]
pub struct TopicDetailResponse {
    #[serde(flatten)]
    pub topic: TopicResponse,
    pub posts: Vec<PostResponse>,
}

/// Post response
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub topic_id: String,
    pub author_id: String,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub message: String,
    pub body_html: String,
}

// ============================================================================
// Private Message Responses
// ============================================================================

/// Private message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub depth: i16,
    pub subject: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

/// Delivered message with its read state
#[derive(Debug, Clone, Serialize)]
pub struct InboxMessageResponse {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub is_read: bool,
}

/// Inbox listing: incoming deliveries plus the user's own sent messages
#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub incoming: Vec<InboxMessageResponse>,
    pub outgoing: Vec<MessageResponse>,
}

/// One node of a conversation reply tree
#[derive(Debug, Clone, Serialize)]
pub struct ConversationNodeResponse {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub replies: Vec<ConversationNodeResponse>,
}

/// Conversation rendered as a reply tree
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<ConversationNodeResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness probe response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
