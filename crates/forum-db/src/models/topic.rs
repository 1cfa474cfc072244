//! Topic database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for topics table
#[derive(Debug, Clone, FromRow)]
pub struct TopicModel {
    pub id: i64,
    pub forum_id: i64,
    pub subject: String,
    pub author_id: i64,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub views: i32,
    pub post_count: i64,
    pub last_post_id: Option<i64>,
}
