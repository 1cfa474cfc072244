//! Data Transfer Objects
//!
//! Request DTOs carry validated client input; response DTOs shape the JSON
//! the API returns. Mapping from domain entities lives in `mappers`.

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateForumRequest, CreatePostRequest, CreateTopicRequest, MoveForumRequest,
    SendMessageRequest,
};
pub use responses::{
    ApiResponse, ConversationNodeResponse, ConversationResponse, ForumDetailResponse,
    ForumNodeResponse, ForumResponse, HealthResponse, InboxMessageResponse, InboxResponse,
    MessageResponse, PostResponse, ReadinessResponse, TopicDetailResponse, TopicResponse,
};
