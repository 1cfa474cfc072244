//! # forum-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ForumService, MessagingService, PermissionService, ProfileService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, TopicService, Viewer,
};
