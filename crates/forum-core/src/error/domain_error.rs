//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Forum not found: {0}")]
    ForumNotFound(Snowflake),

    #[error("Topic not found: {0}")]
    TopicNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(i64),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Message has no recipients")]
    EmptyRecipients,

    #[error("Invalid tree path: {0}")]
    InvalidTreePath(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot move forum {0} under its own subtree")]
    ForumCycle(Snowflake),

    #[error("Forced update of {entity} {id} matched no row")]
    ForcedUpdateFailed { entity: &'static str, id: Snowflake },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ForumNotFound(_) => "UNKNOWN_FORUM",
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::GroupNotFound(_) => "UNKNOWN_GROUP",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EmptyRecipients => "EMPTY_RECIPIENTS",
            Self::InvalidTreePath(_) => "INVALID_TREE_PATH",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",

            // Business Rules
            Self::ForumCycle(_) => "FORUM_CYCLE",
            Self::ForcedUpdateFailed { .. } => "FORCED_UPDATE_FAILED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ForumNotFound(_)
                | Self::TopicNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::GroupNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ContentTooLong { .. }
                | Self::EmptyRecipients
                | Self::InvalidTreePath(_)
                | Self::ForumCycle(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingPermission(_))
    }
}

impl From<crate::value_objects::TreePathError> for DomainError {
    fn from(err: crate::value_objects::TreePathError) -> Self {
        Self::InvalidTreePath(err.to_string())
    }
}
