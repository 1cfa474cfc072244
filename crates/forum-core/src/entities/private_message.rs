//! Private message entity and reply semantics
//!
//! All messages of one thread share a random 64-bit conversation id; replies
//! point at their parent message. Delivery is fanned out as one inbox row
//! per recipient.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeSet;

use crate::value_objects::Snowflake;

/// Private message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateMessage {
    pub id: Snowflake,
    pub sender_id: Snowflake,
    pub conversation_id: i64,
    pub parent_id: Option<Snowflake>,
    pub depth: i16,
    pub subject: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl PrivateMessage {
    /// Create a new top-level message, opening a fresh conversation
    pub fn new_conversation(
        id: Snowflake,
        sender_id: Snowflake,
        subject: String,
        message: String,
    ) -> Self {
        Self {
            id,
            sender_id,
            conversation_id: new_conversation_id(),
            parent_id: None,
            depth: 0,
            subject,
            message,
            created: Utc::now(),
        }
    }

    /// Create a reply to `parent`
    ///
    /// Inherits the conversation id, and the subject when none is given.
    /// `recipients` must already be the resolved reply recipient set (see
    /// [`reply_recipients`]); it determines the depth.
    pub fn new_reply(
        id: Snowflake,
        sender_id: Snowflake,
        parent: &PrivateMessage,
        subject: Option<String>,
        message: String,
        recipients: &[Snowflake],
    ) -> Self {
        Self {
            id,
            sender_id,
            conversation_id: parent.conversation_id,
            parent_id: Some(parent.id),
            depth: reply_depth(parent.depth, recipients.len()),
            subject: subject.unwrap_or_else(|| parent.subject.clone()),
            message,
            created: Utc::now(),
        }
    }

    /// Check if this message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Per-recipient delivery record of a private message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboxEntry {
    pub message_id: Snowflake,
    pub recipient_id: Snowflake,
    pub is_read: bool,
}

impl InboxEntry {
    /// Create an unread delivery record
    pub fn new(message_id: Snowflake, recipient_id: Snowflake) -> Self {
        Self {
            message_id,
            recipient_id,
            is_read: false,
        }
    }
}

/// Generate a fresh random conversation identifier
///
/// Uniqueness is not checked; collisions are negligible at the expected
/// message volume.
pub fn new_conversation_id() -> i64 {
    rand::thread_rng().gen::<i64>()
}

/// Recipient set of a reply: everyone on the parent except the replier,
/// plus the parent's sender
///
/// Deduplicated and returned in a stable order.
pub fn reply_recipients(
    parent_sender: Snowflake,
    parent_recipients: &[Snowflake],
    replier: Snowflake,
) -> Vec<Snowflake> {
    let mut set: BTreeSet<Snowflake> = parent_recipients.iter().copied().collect();
    set.remove(&replier);
    set.insert(parent_sender);
    set.into_iter().collect()
}

/// Depth of a reply: one below the parent only while more than one
/// recipient remains, otherwise 0
///
/// This reproduces the reference behavior for two-party threads; see
/// DESIGN.md for the rationale of keeping it.
pub fn reply_depth(parent_depth: i16, recipient_count: usize) -> i16 {
    if recipient_count > 1 {
        parent_depth + 1
    } else {
        0
    }
}
