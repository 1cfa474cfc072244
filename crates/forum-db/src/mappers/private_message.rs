//! Private message entity <-> model mappers

use forum_core::entities::{InboxEntry, PrivateMessage};
use forum_core::value_objects::Snowflake;

use crate::models::{InboxEntryModel, InboxMessageModel, PrivateMessageModel};

/// Convert PrivateMessageModel to PrivateMessage entity
impl From<PrivateMessageModel> for PrivateMessage {
    fn from(model: PrivateMessageModel) -> Self {
        PrivateMessage {
            id: Snowflake::new(model.id),
            sender_id: Snowflake::new(model.sender_id),
            conversation_id: model.conversation_id,
            parent_id: model.parent_id.map(Snowflake::new),
            depth: model.depth,
            subject: model.subject,
            message: model.message,
            created: model.created,
        }
    }
}

/// Convert InboxEntryModel to InboxEntry entity
impl From<InboxEntryModel> for InboxEntry {
    fn from(model: InboxEntryModel) -> Self {
        InboxEntry {
            message_id: Snowflake::new(model.message_id),
            recipient_id: Snowflake::new(model.recipient_id),
            is_read: model.is_read,
        }
    }
}

/// Split the joined inbox row into message and delivery record
impl From<InboxMessageModel> for (PrivateMessage, InboxEntry) {
    fn from(model: InboxMessageModel) -> Self {
        let entry = InboxEntry {
            message_id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            is_read: model.is_read,
        };
        let message = PrivateMessage {
            id: Snowflake::new(model.id),
            sender_id: Snowflake::new(model.sender_id),
            conversation_id: model.conversation_id,
            parent_id: model.parent_id.map(Snowflake::new),
            depth: model.depth,
            subject: model.subject,
            message: model.message,
            created: model.created,
        };
        (message, entry)
    }
}
