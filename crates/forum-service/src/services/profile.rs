//! Profile service
//!
//! Profiles are created lazily, one per user. Registration is owned by the
//! external account system; this service reacts to its "user registered"
//! event by materializing the local projection, the profile row, and the
//! default group membership.

use forum_core::entities::{Profile, User};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch a user's profile, creating an empty one on first access
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: forum_core::Snowflake) -> ServiceResult<Profile> {
        Ok(self.ctx.profile_repo().get_or_create(user_id).await?)
    }

    /// Handle the external "user registered" event
    ///
    /// Stores the local user projection, creates the profile, and joins the
    /// user to the configured default group.
    #[instrument(skip(self, user))]
    pub async fn on_user_registered(&self, user: &User) -> ServiceResult<Profile> {
        self.ctx.user_repo().create(user).await?;

        let profile = self.ctx.profile_repo().get_or_create(user.id).await?;

        let group = self.ctx.default_group_name();
        self.ctx.permission_repo().ensure_group(group).await?;
        self.ctx
            .permission_repo()
            .add_user_to_group(user.id, group)
            .await?;

        info!(user_id = %user.id, group = group, "User registered");

        Ok(profile)
    }
}
