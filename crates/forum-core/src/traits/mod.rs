pub mod repositories;

pub use repositories::{
    ForumRepository, PermTarget, PermissionRepository, PostRepository, PrivateMessageRepository,
    ProfileRepository, RepoResult, TopicRepository, UserRepository,
};
