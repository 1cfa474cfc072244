//! Forum database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for forums table
#[derive(Debug, Clone, FromRow)]
pub struct ForumModel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<i64>,
    /// Ancestor id chain, dot-terminated, empty for roots
    pub path: String,
    pub depth: i16,
    pub has_subforums: bool,
    pub post_count: i64,
    pub topic_count: i64,
    pub last_post_id: Option<i64>,
    pub updated: DateTime<Utc>,
}

impl ForumModel {
    /// Check if this is a root forum
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
