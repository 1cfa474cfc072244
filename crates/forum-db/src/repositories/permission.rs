//! PostgreSQL implementation of PermissionRepository
//!
//! Object-level grants: each row ties an action ("view", "edit", "destroy")
//! on one target object to either a user or a group. A user holds a
//! permission when a matching row exists for them directly or for any group
//! they belong to.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::error::DomainError;
use forum_core::traits::{PermTarget, PermissionRepository, RepoResult};
use forum_core::value_objects::{PermAction, Snowflake};

use super::error::map_db_error;

/// PostgreSQL implementation of PermissionRepository
#[derive(Clone)]
pub struct PgPermissionRepository {
    pool: PgPool,
}

impl PgPermissionRepository {
    /// Create a new PgPermissionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    #[instrument(skip(self))]
    async fn has_perm(
        &self,
        user_id: Snowflake,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM permissions
                WHERE action = $2 AND target_kind = $3 AND target_id = $4
                  AND (user_id = $1
                       OR group_id IN (SELECT group_id FROM user_groups WHERE user_id = $1))
            )
            "#,
        )
        .bind(user_id.into_inner())
        .bind(action.as_str())
        .bind(target.kind())
        .bind(target.id().into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn forum_ids_with_any_perm(
        &self,
        user_id: Snowflake,
        actions: &[PermAction],
    ) -> RepoResult<Vec<Snowflake>> {
        if actions.is_empty() {
            return Ok(Vec::new());
        }

        let action_names: Vec<String> =
            actions.iter().map(|a| a.as_str().to_string()).collect();
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT target_id FROM permissions
            WHERE action = ANY($2) AND target_kind = 'forum'
              AND (user_id = $1
                   OR group_id IN (SELECT group_id FROM user_groups WHERE user_id = $1))
            ORDER BY target_id
            "#,
        )
        .bind(user_id.into_inner())
        .bind(&action_names)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn grant_user(
        &self,
        user_id: Snowflake,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (action, target_kind, target_id, user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(action.as_str())
        .bind(target.kind())
        .bind(target.id().into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn grant_group(
        &self,
        group: &str,
        action: PermAction,
        target: PermTarget,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO permissions (action, target_kind, target_id, group_id)
            SELECT $1, $2, $3, id FROM groups WHERE name = $4
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(action.as_str())
        .bind(target.kind())
        .bind(target.id().into_inner())
        .bind(group)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        // A grant for a known group always inserts or conflicts; zero rows
        // with no conflict means the group itself is missing
        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM groups WHERE name = $1)")
                    .bind(group)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_error)?;
            if !exists {
                return Err(DomainError::GroupNotFound(group.to_string()));
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn ensure_group(&self, name: &str) -> RepoResult<()> {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_user_to_group(&self, user_id: Snowflake, group: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_groups (user_id, group_id)
            SELECT $1, id FROM groups WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.into_inner())
        .bind(group)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM groups WHERE name = $1)")
                    .bind(group)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_error)?;
            if !exists {
                return Err(DomainError::GroupNotFound(group.to_string()));
            }
        }

        Ok(())
    }
}
