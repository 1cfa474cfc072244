//! Profile database model

use sqlx::FromRow;

/// Database model for profiles table
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ProfileModel {
    pub user_id: i64,
    pub post_count: i64,
}
