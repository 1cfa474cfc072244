//! Forum service
//!
//! Handles the board tree: listing, detail, creation, and reparenting.

use forum_core::entities::{build_forum_tree, Forum};
use forum_core::traits::PermTarget;
use forum_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{
    CreateForumRequest, ForumDetailResponse, ForumNodeResponse, ForumResponse, MoveForumRequest,
    TopicResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::{PermissionService, Viewer};

/// Depth cap of the board index, and how far below itself a forum detail
/// page shows subforums
const TREE_DEPTH: i16 = 3;

/// Forum service
pub struct ForumService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ForumService<'a> {
    /// Create a new ForumService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Board index: the permitted forum tree, down to depth 3
    #[instrument(skip(self))]
    pub async fn list_forums(&self, viewer: Viewer) -> ServiceResult<Vec<ForumNodeResponse>> {
        // The empty prefix matches every path, so this is the whole board
        // down to the depth cap
        let forums = self
            .ctx
            .forum_repo()
            .descendants("", Some(TREE_DEPTH))
            .await?;

        let permitted = PermissionService::new(self.ctx)
            .filter_viewable(viewer, forums)
            .await?;

        Ok(build_forum_tree(None, permitted)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Forum detail: topic list plus the permitted subforum tree
    #[instrument(skip(self))]
    pub async fn get_forum(
        &self,
        viewer: Viewer,
        forum_id: Snowflake,
    ) -> ServiceResult<ForumDetailResponse> {
        let permissions = PermissionService::new(self.ctx);
        let forum = self.get_viewable(viewer, &permissions, forum_id).await?;

        let topics = self.ctx.topic_repo().find_by_forum(forum.id).await?;

        let subforums = self
            .ctx
            .forum_repo()
            .descendants(&forum.subtree_prefix(), Some(forum.depth + TREE_DEPTH))
            .await?;
        let permitted = permissions.filter_viewable(viewer, subforums).await?;

        Ok(ForumDetailResponse {
            forum: ForumResponse::from(&forum),
            topics: topics.iter().map(TopicResponse::from).collect(),
            subforums: build_forum_tree(Some(forum.id), permitted)
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }

    /// Create a forum (admin only)
    #[instrument(skip(self, request))]
    pub async fn create_forum(
        &self,
        viewer: Viewer,
        request: CreateForumRequest,
    ) -> ServiceResult<ForumResponse> {
        PermissionService::new(self.ctx).require_admin(viewer).await?;

        let forum_id = self.ctx.generate_id();
        let forum = match request.parent_id.as_deref() {
            Some(raw) => {
                let parent_id = parse_forum_id(raw)?;
                let parent = self
                    .ctx
                    .forum_repo()
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Forum", raw))?;
                Forum::new_child(forum_id, request.name, request.description, &parent)
            }
            None => Forum::new_root(forum_id, request.name, request.description),
        };

        self.ctx.forum_repo().create(&forum).await?;

        info!(forum_id = %forum.id, parent_id = ?forum.parent_id, "Forum created");

        Ok(ForumResponse::from(&forum))
    }

    /// Reparent a forum (admin only)
    ///
    /// The repository rewrites the whole subtree in one transaction; a cycle
    /// (moving a forum under itself or a descendant) is rejected there.
    #[instrument(skip(self, request))]
    pub async fn move_forum(
        &self,
        viewer: Viewer,
        forum_id: Snowflake,
        request: MoveForumRequest,
    ) -> ServiceResult<ForumResponse> {
        PermissionService::new(self.ctx).require_admin(viewer).await?;

        let new_parent = request
            .parent_id
            .as_deref()
            .map(parse_forum_id)
            .transpose()?;

        let moved = self
            .ctx
            .forum_repo()
            .move_to_parent(forum_id, new_parent)
            .await?;

        info!(forum_id = %forum_id, new_parent = ?new_parent, "Forum moved");

        Ok(ForumResponse::from(&moved))
    }

    /// Fetch a forum the viewer may see; unknown and hidden look the same
    pub(super) async fn get_viewable(
        &self,
        viewer: Viewer,
        permissions: &PermissionService<'_>,
        forum_id: Snowflake,
    ) -> ServiceResult<Forum> {
        let forum = self
            .ctx
            .forum_repo()
            .find_by_id(forum_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Forum", forum_id.to_string()))?;

        permissions
            .require_view(viewer, PermTarget::Forum(forum.id), "Forum")
            .await?;

        Ok(forum)
    }
}

fn parse_forum_id(raw: &str) -> ServiceResult<Snowflake> {
    Snowflake::parse(raw).map_err(|_| ServiceError::validation("Invalid parent_id format"))
}
