//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Profile;
use forum_core::traits::{ProfileRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::ProfileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, user_id: Snowflake) -> RepoResult<Profile> {
        // Lazily created on first access, one row per user
        let result = sqlx::query_as::<_, ProfileModel>(
            r#"
            INSERT INTO profiles (user_id, post_count)
            VALUES ($1, 0)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, post_count
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Profile::from(result))
    }
}
