//! Service context - dependency container for services
//!
//! Holds all repositories, configuration, and other dependencies needed by
//! services.

use std::sync::Arc;

use forum_common::auth::JwtService;
use forum_common::config::ForumConfig;
use forum_core::traits::{
    ForumRepository, PermissionRepository, PostRepository, PrivateMessageRepository,
    ProfileRepository, TopicRepository, UserRepository,
};
use forum_core::{Snowflake, SnowflakeGenerator};
use forum_db::PgPool;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - JWT service for token validation
/// - Snowflake generator for ID generation
/// - Forum configuration (anonymous identity, default group)
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    forum_repo: Arc<dyn ForumRepository>,
    topic_repo: Arc<dyn TopicRepository>,
    post_repo: Arc<dyn PostRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    permission_repo: Arc<dyn PermissionRepository>,
    message_repo: Arc<dyn PrivateMessageRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Configuration
    forum_config: ForumConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        user_repo: Arc<dyn UserRepository>,
        forum_repo: Arc<dyn ForumRepository>,
        topic_repo: Arc<dyn TopicRepository>,
        post_repo: Arc<dyn PostRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        permission_repo: Arc<dyn PermissionRepository>,
        message_repo: Arc<dyn PrivateMessageRepository>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        forum_config: ForumConfig,
    ) -> Self {
        Self {
            pool,
            user_repo,
            forum_repo,
            topic_repo,
            post_repo,
            profile_repo,
            permission_repo,
            message_repo,
            jwt_service,
            snowflake_generator,
            forum_config,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the forum repository
    pub fn forum_repo(&self) -> &dyn ForumRepository {
        self.forum_repo.as_ref()
    }

    /// Get the topic repository
    pub fn topic_repo(&self) -> &dyn TopicRepository {
        self.topic_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    /// Get the permission repository
    pub fn permission_repo(&self) -> &dyn PermissionRepository {
        self.permission_repo.as_ref()
    }

    /// Get the private message repository
    pub fn message_repo(&self) -> &dyn PrivateMessageRepository {
        self.message_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    // === Configuration ===

    /// User id that unauthenticated requests act as
    pub fn anonymous_user_id(&self) -> Snowflake {
        Snowflake::new(self.forum_config.anonymous_user_id)
    }

    /// Group every registered user joins
    pub fn default_group_name(&self) -> &str {
        &self.forum_config.default_group_name
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("forum_config", &self.forum_config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    forum_repo: Option<Arc<dyn ForumRepository>>,
    topic_repo: Option<Arc<dyn TopicRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    permission_repo: Option<Arc<dyn PermissionRepository>>,
    message_repo: Option<Arc<dyn PrivateMessageRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    forum_config: Option<ForumConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            user_repo: None,
            forum_repo: None,
            topic_repo: None,
            post_repo: None,
            profile_repo: None,
            permission_repo: None,
            message_repo: None,
            jwt_service: None,
            snowflake_generator: None,
            forum_config: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn forum_repo(mut self, repo: Arc<dyn ForumRepository>) -> Self {
        self.forum_repo = Some(repo);
        self
    }

    pub fn topic_repo(mut self, repo: Arc<dyn TopicRepository>) -> Self {
        self.topic_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn permission_repo(mut self, repo: Arc<dyn PermissionRepository>) -> Self {
        self.permission_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn PrivateMessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn forum_config(mut self, config: ForumConfig) -> Self {
        self.forum_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.forum_repo
                .ok_or_else(|| ServiceError::validation("forum_repo is required"))?,
            self.topic_repo
                .ok_or_else(|| ServiceError::validation("topic_repo is required"))?,
            self.post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            self.profile_repo
                .ok_or_else(|| ServiceError::validation("profile_repo is required"))?,
            self.permission_repo
                .ok_or_else(|| ServiceError::validation("permission_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.forum_config
                .ok_or_else(|| ServiceError::validation("forum_config is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
