//! Viewer resolution and object-level permission checks
//!
//! Every request acts as a [`Viewer`]: the authenticated user, or the
//! configured anonymous identity when no credentials were presented. The
//! anonymous user holds permissions through its own grants and groups like
//! any other user.
//!
//! A missing view permission is reported as NotFound so that the existence
//! of a hidden forum or topic does not leak.

use std::collections::HashSet;

use forum_core::entities::{Forum, User};
use forum_core::traits::PermTarget;
use forum_core::value_objects::{PermAction, Snowflake};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Identity a request acts as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Snowflake,
    pub is_authenticated: bool,
}

impl Viewer {
    /// Viewer backed by a validated access token
    pub fn authenticated(user_id: Snowflake) -> Self {
        Self {
            user_id,
            is_authenticated: true,
        }
    }

    /// Viewer acting as the configured anonymous identity
    pub fn anonymous(anonymous_user_id: Snowflake) -> Self {
        Self {
            user_id: anonymous_user_id,
            is_authenticated: false,
        }
    }
}

/// Permission service
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check whether the viewer is an admin
    #[instrument(skip(self))]
    pub async fn is_admin(&self, viewer: Viewer) -> ServiceResult<bool> {
        if !viewer.is_authenticated {
            return Ok(false);
        }
        let user = self.ctx.user_repo().find_by_id(viewer.user_id).await?;
        Ok(user.is_some_and(|u| u.is_admin && u.is_active))
    }

    /// Require an active admin, returning the user
    #[instrument(skip(self))]
    pub async fn require_admin(&self, viewer: Viewer) -> ServiceResult<User> {
        if !viewer.is_authenticated {
            return Err(ServiceError::permission_denied("admin"));
        }
        let user = self
            .ctx
            .user_repo()
            .find_by_id(viewer.user_id)
            .await?
            .filter(|u| u.is_admin && u.is_active)
            .ok_or_else(|| ServiceError::permission_denied("admin"))?;
        Ok(user)
    }

    /// Check whether the viewer may perform an action on a target
    ///
    /// Admins hold every permission implicitly.
    #[instrument(skip(self))]
    pub async fn can(
        &self,
        viewer: Viewer,
        action: PermAction,
        target: PermTarget,
    ) -> ServiceResult<bool> {
        if self.is_admin(viewer).await? {
            return Ok(true);
        }
        Ok(self
            .ctx
            .permission_repo()
            .has_perm(viewer.user_id, action, target)
            .await?)
    }

    /// Require view permission on a target, masking a miss as NotFound
    #[instrument(skip(self))]
    pub async fn require_view(
        &self,
        viewer: Viewer,
        target: PermTarget,
        resource: &'static str,
    ) -> ServiceResult<()> {
        if self.can(viewer, PermAction::View, target).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(resource, target.id().to_string()))
        }
    }

    /// Drop forums the viewer may not view
    ///
    /// Admins see everything; everyone else is filtered down to the forums
    /// they hold a view grant on. Other grants do not imply visibility.
    #[instrument(skip(self, forums))]
    pub async fn filter_viewable(
        &self,
        viewer: Viewer,
        forums: Vec<Forum>,
    ) -> ServiceResult<Vec<Forum>> {
        if self.is_admin(viewer).await? {
            return Ok(forums);
        }

        let permitted: HashSet<Snowflake> = self
            .ctx
            .permission_repo()
            .forum_ids_with_any_perm(viewer.user_id, &[PermAction::View])
            .await?
            .into_iter()
            .collect();

        Ok(forums
            .into_iter()
            .filter(|f| permitted.contains(&f.id))
            .collect())
    }
}
