//! Domain entities

mod conversation;
mod forum;
mod post;
mod private_message;
mod profile;
mod topic;
mod user;

pub use conversation::{ConversationNode, ConversationTree};
pub use forum::{build_forum_tree, Forum, ForumNode};
pub use post::Post;
pub use private_message::{new_conversation_id, reply_depth, reply_recipients, InboxEntry, PrivateMessage};
pub use profile::Profile;
pub use topic::Topic;
pub use user::User;
