//! User entity - minimal projection of the external account system
//!
//! Account management (registration, passwords, sessions) lives outside this
//! service; the forum only needs identity, display name, and the admin flag.
//! The well-known anonymous identity is a configured user id, not a special
//! entity variant.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            username,
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
