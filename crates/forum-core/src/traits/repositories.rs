//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Forum, InboxEntry, Post, PrivateMessage, Profile, Topic, User};
use crate::error::DomainError;
use crate::value_objects::{PermAction, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Resolve a batch of usernames; unknown names are skipped
    async fn find_by_usernames(&self, usernames: &[String]) -> RepoResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Forum Repository
// ============================================================================

#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Find forum by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Forum>>;

    /// List every forum, ordered by path then id
    async fn find_all(&self) -> RepoResult<Vec<Forum>>;

    /// List descendants of a subtree prefix, ordered by path then id
    ///
    /// `max_depth` bounds the absolute depth of returned rows; `None` returns
    /// the whole subtree.
    async fn descendants(&self, prefix: &str, max_depth: Option<i16>) -> RepoResult<Vec<Forum>>;

    /// Count direct children of a parent, optionally excluding one forum
    async fn children_count(
        &self,
        parent_id: Snowflake,
        exclude: Option<Snowflake>,
    ) -> RepoResult<i64>;

    /// Create a new forum, refreshing the parent's caches in the same
    /// transaction
    async fn create(&self, forum: &Forum) -> RepoResult<()>;

    /// Persist forum field edits (name, description), then re-run the
    /// save-time counter propagation
    async fn save(&self, forum: &Forum) -> RepoResult<()>;

    /// Reparent a forum, rewriting the paths and depths of its whole
    /// subtree in one transaction
    ///
    /// Returns the forum as stored after the move.
    async fn move_to_parent(
        &self,
        forum_id: Snowflake,
        new_parent: Option<Snowflake>,
    ) -> RepoResult<Forum>;
}

// ============================================================================
// Topic Repository
// ============================================================================

#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Find topic by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>>;

    /// List topics in a forum, most recently active first
    async fn find_by_forum(&self, forum_id: Snowflake) -> RepoResult<Vec<Topic>>;

    /// Create a topic together with its opening post, then propagate
    /// counters, all in one transaction
    async fn create_with_first_post(&self, topic: &Topic, post: &Post) -> RepoResult<()>;

    /// Bump the view counter
    async fn increment_views(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// List posts of a topic in creation order
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<Post>>;

    /// Insert a post and propagate counters up through topic, author
    /// profile, forum, and parent forum in one transaction
    async fn create(&self, post: &Post) -> RepoResult<()>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile for a user, creating an empty one on first access
    async fn get_or_create(&self, user_id: Snowflake) -> RepoResult<Profile>;
}

// ============================================================================
// Permission Repository
// ============================================================================

/// Object a permission grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermTarget {
    Forum(Snowflake),
    Topic(Snowflake),
}

impl PermTarget {
    /// Discriminator stored alongside the grant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forum(_) => "forum",
            Self::Topic(_) => "topic",
        }
    }

    /// Target object id
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Forum(id) => *id,
            Self::Topic(id) => *id,
        }
    }
}

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Check whether a user holds an action on a target, directly or through
    /// any of their groups
    async fn has_perm(
        &self,
        user_id: Snowflake,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<bool>;

    /// Forum ids on which the user holds any of the actions, directly or
    /// through groups
    async fn forum_ids_with_any_perm(
        &self,
        user_id: Snowflake,
        actions: &[PermAction],
    ) -> RepoResult<Vec<Snowflake>>;

    /// Grant an action on a target to a single user
    async fn grant_user(
        &self,
        user_id: Snowflake,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<()>;

    /// Grant an action on a target to a group
    async fn grant_group(
        &self,
        group: &str,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<()>;

    /// Create the named group if it does not exist yet
    async fn ensure_group(&self, name: &str) -> RepoResult<()>;

    /// Add a user to a group
    async fn add_user_to_group(&self, user_id: Snowflake, group: &str) -> RepoResult<()>;
}

// ============================================================================
// Private Message Repository
// ============================================================================

#[async_trait]
pub trait PrivateMessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<PrivateMessage>>;

    /// Store a message and fan out one inbox row per recipient in one
    /// transaction
    async fn send(&self, message: &PrivateMessage, recipients: &[Snowflake]) -> RepoResult<()>;

    /// Messages delivered to a user, newest first, with read state
    async fn inbox(&self, user_id: Snowflake) -> RepoResult<Vec<(PrivateMessage, InboxEntry)>>;

    /// Messages sent by a user, newest first
    async fn outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<PrivateMessage>>;

    /// Messages of one conversation visible to the user (sent or received)
    async fn conversation(
        &self,
        user_id: Snowflake,
        conversation_id: i64,
    ) -> RepoResult<Vec<PrivateMessage>>;

    /// Recipient ids a message was delivered to
    async fn recipients_of(&self, message_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Mark a delivered message as read for one recipient
    async fn mark_read(&self, message_id: Snowflake, recipient_id: Snowflake) -> RepoResult<()>;
}
