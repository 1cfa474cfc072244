//! Error handling utilities for repositories

use forum_core::error::DomainError;
use forum_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "forum not found" error
pub fn forum_not_found(id: Snowflake) -> DomainError {
    DomainError::ForumNotFound(id)
}

/// Create a "topic not found" error
pub fn topic_not_found(id: Snowflake) -> DomainError {
    DomainError::TopicNotFound(id)
}

/// Create a "message not found" error
pub fn message_not_found(id: Snowflake) -> DomainError {
    DomainError::MessageNotFound(id)
}

/// Create a "forced update matched no row" error
pub fn forced_update_failed(entity: &'static str, id: Snowflake) -> DomainError {
    DomainError::ForcedUpdateFailed { entity, id }
}
