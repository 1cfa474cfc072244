//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in forum-core.
//! Each repository handles database operations for a specific domain entity;
//! `counters` holds the shared save-time counter propagation steps.

pub(crate) mod counters;
mod error;
mod forum;
mod permission;
mod post;
mod private_message;
mod profile;
mod topic;
mod user;

pub use forum::PgForumRepository;
pub use permission::PgPermissionRepository;
pub use post::PgPostRepository;
pub use private_message::PgPrivateMessageRepository;
pub use profile::PgProfileRepository;
pub use topic::PgTopicRepository;
pub use user::PgUserRepository;
