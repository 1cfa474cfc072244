//! # forum-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! pure tree/threading algorithms of the forum.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    build_forum_tree, new_conversation_id, reply_depth, reply_recipients, ConversationNode,
    ConversationTree, Forum, ForumNode, InboxEntry, Post, PrivateMessage, Profile, Topic, User,
};
pub use error::DomainError;
pub use traits::{
    ForumRepository, PermTarget, PermissionRepository, PostRepository, PrivateMessageRepository,
    ProfileRepository, RepoResult, TopicRepository, UserRepository,
};
pub use value_objects::{
    PermAction, Snowflake, SnowflakeGenerator, SnowflakeParseError, TreePath, TreePathError,
};
