//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
///
/// `user_ip` is stored as text; the mapper parses it back into an `IpAddr`.
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
    pub message: String,
    pub body_html: String,
    pub user_ip: Option<String>,
}
