//! Topic entity <-> model mapper

use forum_core::entities::Topic;
use forum_core::value_objects::Snowflake;

use crate::models::TopicModel;

/// Convert TopicModel to Topic entity
impl From<TopicModel> for Topic {
    fn from(model: TopicModel) -> Self {
        Topic {
            id: Snowflake::new(model.id),
            forum_id: Snowflake::new(model.forum_id),
            subject: model.subject,
            author_id: Snowflake::new(model.author_id),
            created: model.created,
            updated: model.updated,
            views: model.views,
            post_count: model.post_count,
            last_post_id: model.last_post_id.map(Snowflake::new),
        }
    }
}
