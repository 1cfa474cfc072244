//! User entity <-> model mapper

use forum_core::entities::User;
use forum_core::value_objects::Snowflake;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            is_admin: model.is_admin,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
