//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! permission checks, viewer resolution, validation, and orchestration of
//! domain operations.

pub mod context;
pub mod error;
pub mod forum;
pub mod messaging;
pub mod permission;
pub mod profile;
pub mod topic;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use forum::ForumService;
pub use messaging::MessagingService;
pub use permission::{PermissionService, Viewer};
pub use profile::ProfileService;
pub use topic::TopicService;
