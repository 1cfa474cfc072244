//! Database models - SQLx-compatible structs for PostgreSQL tables

mod forum;
mod post;
mod private_message;
mod profile;
mod topic;
mod user;

pub use forum::ForumModel;
pub use post::PostModel;
pub use private_message::{InboxEntryModel, InboxMessageModel, PrivateMessageModel};
pub use profile::ProfileModel;
pub use topic::TopicModel;
pub use user::UserModel;
