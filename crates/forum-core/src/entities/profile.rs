//! Profile entity - per-user forum statistics
//!
//! A profile is owned by exactly one user account and is created lazily by
//! the repository's get-or-create accessor on first access, never shared.

use crate::value_objects::Snowflake;

/// Profile entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Snowflake,
    /// Total posts authored by the user across all topics
    pub post_count: i64,
}

impl Profile {
    /// Create an empty profile for a user
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            post_count: 0,
        }
    }
}
