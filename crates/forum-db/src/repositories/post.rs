//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use forum_core::entities::Post;
use forum_core::traits::{PostRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::PostModel;

use super::counters::propagate_post_insert;
use super::error::map_db_error;

const POST_COLUMNS: &str =
    "id, topic_id, author_id, created, updated, updated_by, message, body_html, user_ip";

/// Insert a post row on an existing connection
///
/// Shared with the topic repository so topic-plus-first-post creation can
/// reuse it inside one transaction.
pub(super) async fn insert_post(conn: &mut PgConnection, post: &Post) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO posts (id, topic_id, author_id, created, updated, updated_by,
                           message, body_html, user_ip)
        VALUES ($1, $2, $3, $4, NULL, NULL, $5, $6, $7)
        "#,
    )
    .bind(post.id.into_inner())
    .bind(post.topic_id.into_inner())
    .bind(post.author_id.into_inner())
    .bind(post.created)
    .bind(&post.message)
    .bind(&post.body_html)
    .bind(post.user_ip.map(|ip| ip.to_string()))
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE topic_id = $1
            ORDER BY id
            "#
        ))
        .bind(topic_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, post))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        insert_post(&mut tx, post).await?;

        let now = Utc::now();
        propagate_post_insert(&mut tx, post.topic_id, post.id, post.author_id, now).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPostRepository>();
    }
}
