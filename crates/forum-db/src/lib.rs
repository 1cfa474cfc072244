//! # forum-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `forum-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the save-time counter
//!   propagation that keeps the denormalized counts consistent
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forum_db::pool::{create_pool, DatabaseConfig};
//! use forum_db::repositories::PgForumRepository;
//! use forum_core::traits::ForumRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let forum_repo = PgForumRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgForumRepository, PgPermissionRepository, PgPostRepository, PgPrivateMessageRepository,
    PgProfileRepository, PgTopicRepository, PgUserRepository,
};
