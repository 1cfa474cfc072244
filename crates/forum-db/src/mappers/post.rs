//! Post entity <-> model mapper

use forum_core::entities::Post;
use forum_core::value_objects::Snowflake;

use crate::models::PostModel;

/// Convert PostModel to Post entity
///
/// An unparseable stored IP is dropped rather than failing the read.
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            topic_id: Snowflake::new(model.topic_id),
            author_id: Snowflake::new(model.author_id),
            created: model.created,
            updated: model.updated,
            updated_by: model.updated_by.map(Snowflake::new),
            message: model.message,
            body_html: model.body_html,
            user_ip: model.user_ip.and_then(|ip| ip.parse().ok()),
        }
    }
}
