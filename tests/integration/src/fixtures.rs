//! Test fixtures and data generators
//!
//! Provides reusable test data and database seeding for integration tests.
//! Account registration lives outside this service, so tests seed users
//! through the same path the registration event handler uses and mint
//! tokens directly.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use forum_api::state::AppState;
use forum_core::entities::User;
use forum_core::traits::PermTarget;
use forum_core::value_objects::PermAction;
use forum_core::Snowflake;
use forum_service::ProfileService;
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A seeded user with a valid access token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Snowflake {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// Seed a user the way the registration event handler would, and issue a token
pub async fn seed_user(state: &AppState, is_admin: bool) -> Result<TestUser> {
    let ctx = state.service_context();

    let mut user = User::new(ctx.generate_id(), format!("testuser{}", unique_suffix()));
    user.is_admin = is_admin;

    ProfileService::new(ctx).on_user_registered(&user).await?;

    let token = ctx.jwt_service().issue_token(user.id)?;

    Ok(TestUser { user, token })
}

/// Grant a user an action on a forum
pub async fn grant_forum_perm(
    state: &AppState,
    user_id: Snowflake,
    action: PermAction,
    forum_id: &str,
) -> Result<()> {
    let forum_id = Snowflake::parse(forum_id)?;
    state
        .service_context()
        .permission_repo()
        .grant_user(user_id, action, PermTarget::Forum(forum_id))
        .await?;
    Ok(())
}

/// Grant a user view access to a forum
pub async fn grant_view(state: &AppState, user_id: Snowflake, forum_id: &str) -> Result<()> {
    grant_forum_perm(state, user_id, PermAction::View, forum_id).await
}

/// Seed the configured anonymous user so anonymous grants have a subject
pub async fn seed_anonymous_user(state: &AppState) -> Result<Snowflake> {
    let ctx = state.service_context();
    let anon_id = ctx.anonymous_user_id();

    if ctx.user_repo().find_by_id(anon_id).await?.is_none() {
        let user = User::new(anon_id, format!("anonymous{}", anon_id));
        ctx.user_repo().create(&user).await?;
    }

    Ok(anon_id)
}

// ============================================================================
// Request fixtures
// ============================================================================

/// Create forum request
#[derive(Debug, Serialize)]
pub struct CreateForumBody {
    pub name: String,
    pub description: String,
    pub parent_id: Option<String>,
}

impl CreateForumBody {
    pub fn root() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("Test Forum {suffix}"),
            description: "A test forum".to_string(),
            parent_id: None,
        }
    }

    pub fn child_of(parent_id: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("Test Subforum {suffix}"),
            description: "A test subforum".to_string(),
            parent_id: Some(parent_id.to_string()),
        }
    }
}

/// Move forum request
#[derive(Debug, Serialize)]
pub struct MoveForumBody {
    pub parent_id: Option<String>,
}

/// Create topic request
#[derive(Debug, Serialize)]
pub struct CreateTopicBody {
    pub subject: String,
    pub message: String,
}

impl CreateTopicBody {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            subject: format!("Test Topic {suffix}"),
            message: "Opening post".to_string(),
        }
    }
}

/// Create post request
#[derive(Debug, Serialize)]
pub struct CreatePostBody {
    pub message: String,
}

/// Send message request
#[derive(Debug, Serialize)]
pub struct SendMessageBody {
    pub subject: Option<String>,
    pub message: String,
    pub recipients: Vec<String>,
    pub parent_id: Option<String>,
}

impl SendMessageBody {
    pub fn new_conversation(recipients: &[&str]) -> Self {
        let suffix = unique_suffix();
        Self {
            subject: Some(format!("Test Subject {suffix}")),
            message: "Hello there".to_string(),
            recipients: recipients.iter().map(ToString::to_string).collect(),
            parent_id: None,
        }
    }

    pub fn reply_to(parent_id: &str) -> Self {
        Self {
            subject: None,
            message: "Replying".to_string(),
            recipients: vec![],
            parent_id: Some(parent_id.to_string()),
        }
    }
}

// ============================================================================
// Response fixtures
// ============================================================================

/// Generic data wrapper matching the API envelope
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// Forum response
#[derive(Debug, Deserialize)]
pub struct ForumData {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub depth: i16,
    pub has_subforums: bool,
    pub post_count: i64,
    pub topic_count: i64,
    pub last_post_id: Option<String>,
}

/// Forum tree node response
#[derive(Debug, Deserialize)]
pub struct ForumNodeData {
    #[serde(flatten)]
    pub forum: ForumData,
    pub children: Vec<ForumNodeData>,
}

/// Forum detail response
#[derive(Debug, Deserialize)]
pub struct ForumDetailData {
    #[serde(flatten)]
    pub forum: ForumData,
    pub topics: Vec<TopicData>,
    pub subforums: Vec<ForumNodeData>,
}

/// Topic response
#[derive(Debug, Deserialize)]
pub struct TopicData {
    pub id: String,
    pub forum_id: String,
    pub subject: String,
    pub views: i32,
    pub post_count: i64,
    pub last_post_id: Option<String>,
}

/// Topic detail response
#[derive(Debug, Deserialize)]
pub struct TopicDetailData {
    #[serde(flatten)]
    pub topic: TopicData,
    pub posts: Vec<PostData>,
}

/// Post response
#[derive(Debug, Deserialize)]
pub struct PostData {
    pub id: String,
    pub author_id: String,
    pub message: String,
    pub body_html: String,
}

/// Private message response
#[derive(Debug, Deserialize)]
pub struct MessageData {
    pub id: String,
    pub sender_id: String,
    pub conversation_id: String,
    pub parent_id: Option<String>,
    pub depth: i16,
    pub subject: String,
    pub message: String,
}

/// Inbox message response
#[derive(Debug, Deserialize)]
pub struct InboxMessageData {
    #[serde(flatten)]
    pub message: MessageData,
    pub is_read: bool,
}

/// Inbox response
#[derive(Debug, Deserialize)]
pub struct InboxData {
    pub incoming: Vec<InboxMessageData>,
    pub outgoing: Vec<MessageData>,
}

/// Conversation tree node
#[derive(Debug, Deserialize)]
pub struct ConversationNodeData {
    #[serde(flatten)]
    pub message: MessageData,
    pub replies: Vec<ConversationNodeData>,
}

/// Conversation response
#[derive(Debug, Deserialize)]
pub struct ConversationData {
    pub conversation_id: String,
    pub messages: Vec<ConversationNodeData>,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorData {
    pub error: ErrorBodyData,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBodyData {
    pub code: String,
    pub message: String,
}
