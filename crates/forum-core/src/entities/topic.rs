//! Topic entity - a discussion thread inside one forum

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Topic entity
///
/// `post_count` and `last_post_id` are denormalized caches kept in sync by
/// the save-time propagation; `views` is bumped on each topic page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: Snowflake,
    pub forum_id: Snowflake,
    pub subject: String,
    pub author_id: Snowflake,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub views: i32,
    pub post_count: i64,
    pub last_post_id: Option<Snowflake>,
}

impl Topic {
    /// Create a new Topic
    pub fn new(id: Snowflake, forum_id: Snowflake, subject: String, author_id: Snowflake) -> Self {
        Self {
            id,
            forum_id,
            subject,
            author_id,
            created: Utc::now(),
            updated: None,
            views: 0,
            post_count: 0,
            last_post_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_topic_starts_empty() {
        let topic = Topic::new(
            Snowflake::new(1),
            Snowflake::new(10),
            "Welcome".to_string(),
            Snowflake::new(100),
        );
        assert_eq!(topic.post_count, 0);
        assert_eq!(topic.views, 0);
        assert!(topic.last_post_id.is_none());
        assert!(topic.updated.is_none());
    }
}
