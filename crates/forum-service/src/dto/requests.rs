//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where they carry free-form
//! input, `Validate`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Forum Requests
// ============================================================================

/// Create forum request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateForumRequest {
    #[validate(length(min = 1, max = 80, message = "Forum name must be 1-80 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[serde(default)]
    pub description: String,

    /// Parent forum id (Snowflake as string); null for a root forum
    pub parent_id: Option<String>,
}

/// Move forum request (admin only)
///
/// `parent_id = null` moves the forum to the root level.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MoveForumRequest {
    pub parent_id: Option<String>,
}

// ============================================================================
// Topic / Post Requests
// ============================================================================

/// Create topic request: subject plus the opening post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
}

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
}

// ============================================================================
// Private Message Requests
// ============================================================================

/// Send a private message or a reply
///
/// A top-level message names its recipients by username and must carry a
/// subject. A reply sets `parent_id`; its recipients and (absent an explicit
/// subject) its subject derive from the parent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,

    /// Recipient usernames (top-level messages only)
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Parent message id (Snowflake as string) when replying
    pub parent_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_forum_request_validation() {
        let ok = CreateForumRequest {
            name: "General".to_string(),
            description: String::new(),
            parent_id: None,
        };
        assert!(ok.validate().is_ok());

        let bad = CreateForumRequest {
            name: String::new(),
            description: String::new(),
            parent_id: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_topic_request_rejects_empty_message() {
        let bad = CreateTopicRequest {
            subject: "Hello".to_string(),
            message: String::new(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_send_message_request_deserializes_reply() {
        let json = r#"{"message": "hi", "parent_id": "42"}"#;
        let req: SendMessageRequest = serde_json::from_str(json).unwrap();
        assert!(req.recipients.is_empty());
        assert_eq!(req.parent_id.as_deref(), Some("42"));
        assert!(req.validate().is_ok());
    }
}
