//! Private message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for private_messages table
#[derive(Debug, Clone, FromRow)]
pub struct PrivateMessageModel {
    pub id: i64,
    pub sender_id: i64,
    pub conversation_id: i64,
    pub parent_id: Option<i64>,
    pub depth: i16,
    pub subject: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

/// Database model for inbox table
#[derive(Debug, Clone, Copy, FromRow)]
pub struct InboxEntryModel {
    pub message_id: i64,
    pub recipient_id: i64,
    pub is_read: bool,
}

/// Message joined with its inbox row for one recipient
#[derive(Debug, Clone, FromRow)]
pub struct InboxMessageModel {
    pub id: i64,
    pub sender_id: i64,
    pub conversation_id: i64,
    pub parent_id: Option<i64>,
    pub depth: i16,
    pub subject: String,
    pub message: String,
    pub created: DateTime<Utc>,
    pub recipient_id: i64,
    pub is_read: bool,
}
