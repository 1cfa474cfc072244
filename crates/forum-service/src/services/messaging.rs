//! Private messaging service
//!
//! Sending opens a conversation or extends one; delivery fans out one inbox
//! row per recipient. Conversation rendering builds the reply tree from the
//! messages the viewer took part in.

use std::collections::HashSet;

use forum_common::AppError;
use forum_core::entities::{reply_recipients, ConversationTree, PrivateMessage};
use forum_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{
    ConversationResponse, InboxMessageResponse, InboxResponse, MessageResponse, SendMessageRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::Viewer;

/// Private messaging service
pub struct MessagingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessagingService<'a> {
    /// Create a new MessagingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a top-level message or a reply (authenticated)
    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        viewer: Viewer,
        mut request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        require_authenticated(viewer)?;

        match request.parent_id.take() {
            Some(raw) => self.send_reply(viewer, &raw, request).await,
            None => self.send_new(viewer, request).await,
        }
    }

    /// Inbox: incoming deliveries with read state, plus sent messages
    #[instrument(skip(self))]
    pub async fn inbox(&self, viewer: Viewer) -> ServiceResult<InboxResponse> {
        require_authenticated(viewer)?;

        let incoming = self.ctx.message_repo().inbox(viewer.user_id).await?;
        let outgoing = self.ctx.message_repo().outgoing(viewer.user_id).await?;

        Ok(InboxResponse {
            incoming: incoming
                .into_iter()
                .map(InboxMessageResponse::from)
                .collect(),
            outgoing: outgoing.iter().map(MessageResponse::from).collect(),
        })
    }

    /// Render one conversation as a reply tree
    ///
    /// Only messages the viewer sent or received are included; replies whose
    /// parent is outside that set surface as roots.
    #[instrument(skip(self))]
    pub async fn conversation(
        &self,
        viewer: Viewer,
        conversation_id: i64,
    ) -> ServiceResult<ConversationResponse> {
        require_authenticated(viewer)?;

        let messages = self
            .ctx
            .message_repo()
            .conversation(viewer.user_id, conversation_id)
            .await?;

        if messages.is_empty() {
            return Err(ServiceError::not_found(
                "Conversation",
                conversation_id.to_string(),
            ));
        }

        Ok(ConversationTree::build(conversation_id, messages).into())
    }

    /// Mark one delivered message as read for the viewer
    #[instrument(skip(self))]
    pub async fn mark_read(&self, viewer: Viewer, message_id: Snowflake) -> ServiceResult<()> {
        require_authenticated(viewer)?;

        self.ctx
            .message_repo()
            .mark_read(message_id, viewer.user_id)
            .await?;

        Ok(())
    }

    async fn send_new(
        &self,
        viewer: Viewer,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let subject = request
            .subject
            .ok_or_else(|| ServiceError::validation("Subject is required"))?;

        let users = self
            .ctx
            .user_repo()
            .find_by_usernames(&request.recipients)
            .await?;

        // Every requested username must resolve to a real user
        let known: HashSet<&str> = users.iter().map(|u| u.username.as_str()).collect();
        let unknown: Vec<&str> = request
            .recipients
            .iter()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(ServiceError::validation(format!(
                "Unknown recipient: {}",
                unknown.join(", ")
            )));
        }

        // Senders never deliver to themselves
        let recipients: Vec<Snowflake> = users
            .iter()
            .map(|u| u.id)
            .filter(|&id| id != viewer.user_id)
            .collect();
        if recipients.is_empty() {
            return Err(ServiceError::validation(
                "At least one valid recipient is required",
            ));
        }

        let message = PrivateMessage::new_conversation(
            self.ctx.generate_id(),
            viewer.user_id,
            subject,
            request.message,
        );
        self.ctx.message_repo().send(&message, &recipients).await?;

        info!(
            message_id = %message.id,
            conversation_id = message.conversation_id,
            recipient_count = recipients.len(),
            "Message sent"
        );

        Ok(MessageResponse::from(&message))
    }

    async fn send_reply(
        &self,
        viewer: Viewer,
        raw_parent_id: &str,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let parent_id = Snowflake::parse(raw_parent_id)
            .map_err(|_| ServiceError::validation("Invalid parent_id format"))?;

        let parent = self
            .ctx
            .message_repo()
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", raw_parent_id))?;

        let parent_recipients = self.ctx.message_repo().recipients_of(parent.id).await?;

        // Only participants may reply; outsiders see nothing
        let is_participant = parent.sender_id == viewer.user_id
            || parent_recipients.contains(&viewer.user_id);
        if !is_participant {
            return Err(ServiceError::not_found("Message", raw_parent_id));
        }

        let recipients =
            reply_recipients(parent.sender_id, &parent_recipients, viewer.user_id);

        let message = PrivateMessage::new_reply(
            self.ctx.generate_id(),
            viewer.user_id,
            &parent,
            request.subject,
            request.message,
            &recipients,
        );
        self.ctx.message_repo().send(&message, &recipients).await?;

        info!(
            message_id = %message.id,
            parent_id = %parent.id,
            conversation_id = message.conversation_id,
            "Reply sent"
        );

        Ok(MessageResponse::from(&message))
    }
}

fn require_authenticated(viewer: Viewer) -> ServiceResult<()> {
    if viewer.is_authenticated {
        Ok(())
    } else {
        Err(ServiceError::App(AppError::MissingAuth))
    }
}
