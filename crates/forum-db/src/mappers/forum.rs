//! Forum entity <-> model mapper

use forum_core::entities::Forum;
use forum_core::error::DomainError;
use forum_core::value_objects::{Snowflake, TreePath};

use crate::models::ForumModel;

/// Convert ForumModel to Forum entity
///
/// Fallible because the stored path is re-validated on the way out.
impl TryFrom<ForumModel> for Forum {
    type Error = DomainError;

    fn try_from(model: ForumModel) -> Result<Self, Self::Error> {
        Ok(Forum {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            parent_id: model.parent_id.map(Snowflake::new),
            path: TreePath::parse(&model.path)?,
            depth: model.depth,
            has_subforums: model.has_subforums,
            post_count: model.post_count,
            topic_count: model.topic_count,
            last_post_id: model.last_post_id.map(Snowflake::new),
            updated: model.updated,
        })
    }
}
