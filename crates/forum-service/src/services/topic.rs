//! Topic service
//!
//! Topic pages and the two write paths that feed the counter propagation:
//! opening a topic (with its first post) and replying to one.

use std::net::IpAddr;

use forum_common::AppError;
use forum_core::entities::{Post, Topic};
use forum_core::traits::PermTarget;
use forum_core::value_objects::PermAction;
use forum_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{CreatePostRequest, CreateTopicRequest, PostResponse, TopicDetailResponse, TopicResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::forum::ForumService;
use super::permission::{PermissionService, Viewer};

/// Topic service
pub struct TopicService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TopicService<'a> {
    /// Create a new TopicService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Topic detail: posts in creation order, bumping the view counter
    #[instrument(skip(self))]
    pub async fn get_topic(
        &self,
        viewer: Viewer,
        topic_id: Snowflake,
    ) -> ServiceResult<TopicDetailResponse> {
        let mut topic = self.get_viewable(viewer, topic_id).await?;

        self.ctx.topic_repo().increment_views(topic.id).await?;
        topic.views += 1;

        let posts = self.ctx.post_repo().find_by_topic(topic.id).await?;

        Ok(TopicDetailResponse {
            topic: TopicResponse::from(&topic),
            posts: posts.iter().map(PostResponse::from).collect(),
        })
    }

    /// Open a topic with its first post (authenticated)
    #[instrument(skip(self, request))]
    pub async fn create_topic(
        &self,
        viewer: Viewer,
        forum_id: Snowflake,
        request: CreateTopicRequest,
        user_ip: Option<IpAddr>,
    ) -> ServiceResult<TopicResponse> {
        require_authenticated(viewer)?;

        let permissions = PermissionService::new(self.ctx);
        let forum = ForumService::new(self.ctx)
            .get_viewable(viewer, &permissions, forum_id)
            .await?;

        let topic = Topic::new(
            self.ctx.generate_id(),
            forum.id,
            request.subject,
            viewer.user_id,
        );
        let post = Post::new(
            self.ctx.generate_id(),
            topic.id,
            viewer.user_id,
            request.message,
            user_ip,
        );

        self.ctx
            .topic_repo()
            .create_with_first_post(&topic, &post)
            .await?;

        info!(topic_id = %topic.id, forum_id = %forum.id, "Topic created");

        // Re-read: the propagation filled in post_count / last_post_id
        let stored = self
            .ctx
            .topic_repo()
            .find_by_id(topic.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Topic", topic.id.to_string()))?;

        Ok(TopicResponse::from(&stored))
    }

    /// Reply to a topic (authenticated)
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        viewer: Viewer,
        topic_id: Snowflake,
        request: CreatePostRequest,
        user_ip: Option<IpAddr>,
    ) -> ServiceResult<PostResponse> {
        require_authenticated(viewer)?;

        let topic = self.get_viewable(viewer, topic_id).await?;

        let post = Post::new(
            self.ctx.generate_id(),
            topic.id,
            viewer.user_id,
            request.message,
            user_ip,
        );
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, topic_id = %topic.id, "Post created");

        Ok(PostResponse::from(&post))
    }

    /// Fetch a topic the viewer may see
    ///
    /// Visibility follows the enclosing forum; a hidden topic reads as
    /// missing.
    async fn get_viewable(&self, viewer: Viewer, topic_id: Snowflake) -> ServiceResult<Topic> {
        let topic = self
            .ctx
            .topic_repo()
            .find_by_id(topic_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Topic", topic_id.to_string()))?;

        let permissions = PermissionService::new(self.ctx);
        if permissions
            .can(viewer, PermAction::View, PermTarget::Forum(topic.forum_id))
            .await?
        {
            Ok(topic)
        } else {
            Err(ServiceError::not_found("Topic", topic_id.to_string()))
        }
    }
}

fn require_authenticated(viewer: Viewer) -> ServiceResult<()> {
    if viewer.is_authenticated {
        Ok(())
    } else {
        Err(ServiceError::App(AppError::MissingAuth))
    }
}
