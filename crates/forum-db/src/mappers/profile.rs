//! Profile entity <-> model mapper

use forum_core::entities::Profile;
use forum_core::value_objects::Snowflake;

use crate::models::ProfileModel;

/// Convert ProfileModel to Profile entity
impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            user_id: Snowflake::new(model.user_id),
            post_count: model.post_count,
        }
    }
}
