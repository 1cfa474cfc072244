//! Entity to response DTO mappers

use forum_core::entities::{
    ConversationNode, ConversationTree, Forum, ForumNode, InboxEntry, Post, PrivateMessage, Topic,
};
use forum_core::Snowflake;

use super::responses::{
    ConversationNodeResponse, ConversationResponse, ForumNodeResponse, ForumResponse,
    InboxMessageResponse, MessageResponse, PostResponse, TopicResponse,
};

impl From<&Forum> for ForumResponse {
    fn from(forum: &Forum) -> Self {
        Self {
            id: forum.id.to_string(),
            name: forum.name.clone(),
            description: forum.description.clone(),
            parent_id: forum.parent_id.map(|id| id.to_string()),
            depth: forum.depth,
            has_subforums: forum.has_subforums,
            post_count: forum.post_count,
            topic_count: forum.topic_count,
            last_post_id: forum.last_post_id.map(|id| id.to_string()),
            updated: forum.updated,
        }
    }
}

impl From<ForumNode> for ForumNodeResponse {
    fn from(node: ForumNode) -> Self {
        Self {
            forum: ForumResponse::from(&node.forum),
            children: node.children.into_iter().map(Self::from).collect(),
        }
    }
}

impl From<&Topic> for TopicResponse {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id.to_string(),
            forum_id: topic.forum_id.to_string(),
            subject: topic.subject.clone(),
            author_id: topic.author_id.to_string(),
            created: topic.created,
            updated: topic.updated,
            views: topic.views,
            post_count: topic.post_count,
            last_post_id: topic.last_post_id.map(|id| id.to_string()),
        }
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            topic_id: post.topic_id.to_string(),
            author_id: post.author_id.to_string(),
            created: post.created,
            updated: post.updated,
            updated_by: post.updated_by.map(|id| id.to_string()),
            message: post.message.clone(),
            body_html: post.body_html.clone(),
        }
    }
}

impl From<&PrivateMessage> for MessageResponse {
    fn from(message: &PrivateMessage) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            conversation_id: message.conversation_id.to_string(),
            parent_id: message.parent_id.map(|id: Snowflake| id.to_string()),
            depth: message.depth,
            subject: message.subject.clone(),
            message: message.message.clone(),
            created: message.created,
        }
    }
}

impl From<(PrivateMessage, InboxEntry)> for InboxMessageResponse {
    fn from((message, entry): (PrivateMessage, InboxEntry)) -> Self {
        Self {
            message: MessageResponse::from(&message),
            is_read: entry.is_read,
        }
    }
}

impl From<ConversationNode> for ConversationNodeResponse {
    fn from(node: ConversationNode) -> Self {
        Self {
            message: MessageResponse::from(&node.message),
            replies: node.replies.into_iter().map(Self::from).collect(),
        }
    }
}

impl From<ConversationTree> for ConversationResponse {
    fn from(tree: ConversationTree) -> Self {
        Self {
            conversation_id: tree.conversation_id.to_string(),
            messages: tree.roots.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forum_response_stringifies_ids() {
        let root = Forum::new_root(Snowflake::new(7), "General".to_string(), String::new());
        let child = Forum::new_child(Snowflake::new(8), "Sub".to_string(), String::new(), &root);

        let response = ForumResponse::from(&child);
        assert_eq!(response.id, "8");
        assert_eq!(response.parent_id.as_deref(), Some("7"));
        assert_eq!(response.depth, 1);
    }

    #[test]
    fn test_inbox_message_carries_read_flag() {
        let message = PrivateMessage::new_conversation(
            Snowflake::new(1),
            Snowflake::new(2),
            "hi".to_string(),
            "body".to_string(),
        );
        let entry = InboxEntry::new(message.id, Snowflake::new(3));

        let response = InboxMessageResponse::from((message, entry));
        assert!(!response.is_read);
        assert_eq!(response.message.id, "1");
    }
}
