//! PostgreSQL implementation of ForumRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Forum;
use forum_core::error::DomainError;
use forum_core::traits::{ForumRepository, RepoResult};
use forum_core::value_objects::{Snowflake, TreePath};

use crate::models::ForumModel;

use super::counters::sync_parent_after_forum;
use super::error::{forced_update_failed, forum_not_found, map_db_error};

const FORUM_COLUMNS: &str = "id, name, description, parent_id, path, depth, has_subforums, \
                             post_count, topic_count, last_post_id, updated";

/// PostgreSQL implementation of ForumRepository
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    /// Create a new PgForumRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_model(
        conn: &mut sqlx::PgConnection,
        id: Snowflake,
    ) -> RepoResult<Option<ForumModel>> {
        sqlx::query_as::<_, ForumModel>(&format!(
            "SELECT {FORUM_COLUMNS} FROM forums WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl ForumRepository for PgForumRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Forum>> {
        let result = sqlx::query_as::<_, ForumModel>(&format!(
            "SELECT {FORUM_COLUMNS} FROM forums WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Forum::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Forum>> {
        let results = sqlx::query_as::<_, ForumModel>(&format!(
            "SELECT {FORUM_COLUMNS} FROM forums ORDER BY path, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Forum::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn descendants(&self, prefix: &str, max_depth: Option<i16>) -> RepoResult<Vec<Forum>> {
        // The prefix is digits and dots only, so LIKE needs no escaping.
        // The trailing dot anchors the match at a segment boundary.
        let results = sqlx::query_as::<_, ForumModel>(&format!(
            r#"
            SELECT {FORUM_COLUMNS}
            FROM forums
            WHERE path LIKE $1 || '%'
              AND ($2::smallint IS NULL OR depth <= $2)
            ORDER BY path, id
            "#
        ))
        .bind(prefix)
        .bind(max_depth)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Forum::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn children_count(
        &self,
        parent_id: Snowflake,
        exclude: Option<Snowflake>,
    ) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM forums
            WHERE parent_id = $1 AND ($2::bigint IS NULL OR id <> $2)
            "#,
        )
        .bind(parent_id.into_inner())
        .bind(exclude.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn create(&self, forum: &Forum) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO forums (id, name, description, parent_id, path, depth, has_subforums,
                                post_count, topic_count, last_post_id, updated)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, 0, 0, NULL, $7)
            "#,
        )
        .bind(forum.id.into_inner())
        .bind(&forum.name)
        .bind(&forum.description)
        .bind(forum.parent_id.map(Snowflake::into_inner))
        .bind(forum.path.as_str())
        .bind(forum.depth)
        .bind(forum.updated)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if let Some(parent_id) = forum.parent_id {
            sqlx::query("UPDATE forums SET has_subforums = TRUE WHERE id = $1")
                .bind(parent_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            sync_parent_after_forum(&mut tx, forum.id, parent_id).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn save(&self, forum: &Forum) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE forums
            SET name = $2, description = $3, updated = NOW()
            WHERE id = $1
            "#,
        )
        .bind(forum.id.into_inner())
        .bind(&forum.name)
        .bind(&forum.description)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(forum_not_found(forum.id));
        }

        if let Some(parent_id) = forum.parent_id {
            sync_parent_after_forum(&mut tx, forum.id, parent_id).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn move_to_parent(
        &self,
        forum_id: Snowflake,
        new_parent: Option<Snowflake>,
    ) -> RepoResult<Forum> {
        if new_parent == Some(forum_id) {
            return Err(DomainError::ForumCycle(forum_id));
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let forum = Self::fetch_model(&mut tx, forum_id)
            .await?
            .ok_or_else(|| forum_not_found(forum_id))?;
        let old_path = TreePath::parse(&forum.path)?;
        let old_prefix = old_path.subtree_prefix(forum_id);
        let old_parent_id = forum.parent_id.map(Snowflake::new);

        // Resolve the target and refuse a move into the forum's own subtree
        let (new_path, new_depth) = match new_parent {
            Some(parent_id) => {
                let parent = Self::fetch_model(&mut tx, parent_id)
                    .await?
                    .ok_or_else(|| forum_not_found(parent_id))?;
                let parent_path = TreePath::parse(&parent.path)?;
                if parent_path.is_within(&old_prefix) {
                    return Err(DomainError::ForumCycle(forum_id));
                }
                (
                    TreePath::child_of(&parent_path, parent_id),
                    parent.depth + 1,
                )
            }
            None => (TreePath::root(), 0),
        };
        let new_prefix = new_path.subtree_prefix(forum_id);
        let depth_delta = new_depth - forum.depth;

        // Old parent loses its subforum flag when this was its last child
        if let Some(old_parent_id) = old_parent_id.filter(|&p| Some(p) != new_parent) {
            let remaining: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM forums WHERE parent_id = $1 AND id <> $2",
            )
            .bind(old_parent_id.into_inner())
            .bind(forum_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if remaining == 0 {
                sqlx::query("UPDATE forums SET has_subforums = FALSE WHERE id = $1")
                    .bind(old_parent_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
        }

        // Rewrite the whole subtree in one pass: swap the leading prefix and
        // shift every descendant's depth by the same delta
        let suffix_start = i32::try_from(old_prefix.len() + 1)
            .map_err(|_| DomainError::InternalError("subtree prefix too long".to_string()))?;
        sqlx::query(
            r#"
            UPDATE forums
            SET path = $2 || substr(path, $3),
                depth = depth + $4
            WHERE path LIKE $1 || '%'
            "#,
        )
        .bind(&old_prefix)
        .bind(&new_prefix)
        .bind(suffix_start)
        .bind(i32::from(depth_delta))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if let Some(parent_id) = new_parent {
            sqlx::query("UPDATE forums SET has_subforums = TRUE WHERE id = $1")
                .bind(parent_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        // The moved forum itself is persisted last
        let result = sqlx::query(
            r#"
            UPDATE forums
            SET parent_id = $2, path = $3, depth = $4, updated = NOW()
            WHERE id = $1
            "#,
        )
        .bind(forum_id.into_inner())
        .bind(new_parent.map(Snowflake::into_inner))
        .bind(new_path.as_str())
        .bind(new_depth)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(forced_update_failed("forum", forum_id));
        }

        let moved = Self::fetch_model(&mut tx, forum_id)
            .await?
            .ok_or_else(|| forum_not_found(forum_id))?;

        tx.commit().await.map_err(map_db_error)?;

        Forum::try_from(moved)
    }
}
