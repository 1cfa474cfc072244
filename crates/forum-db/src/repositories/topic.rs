//! PostgreSQL implementation of TopicRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::{Post, Topic};
use forum_core::traits::{RepoResult, TopicRepository};
use forum_core::value_objects::Snowflake;

use crate::models::TopicModel;

use super::counters::propagate_post_insert;
use super::error::{map_db_error, topic_not_found};
use super::post::insert_post;

const TOPIC_COLUMNS: &str =
    "id, forum_id, subject, author_id, created, updated, views, post_count, last_post_id";

/// PostgreSQL implementation of TopicRepository
#[derive(Clone)]
pub struct PgTopicRepository {
    pool: PgPool,
}

impl PgTopicRepository {
    /// Create a new PgTopicRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        let result = sqlx::query_as::<_, TopicModel>(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Topic::from))
    }

    #[instrument(skip(self))]
    async fn find_by_forum(&self, forum_id: Snowflake) -> RepoResult<Vec<Topic>> {
        let results = sqlx::query_as::<_, TopicModel>(&format!(
            r#"
            SELECT {TOPIC_COLUMNS}
            FROM topics
            WHERE forum_id = $1
            ORDER BY updated DESC NULLS LAST, id DESC
            "#
        ))
        .bind(forum_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Topic::from).collect())
    }

    #[instrument(skip(self, topic, post))]
    async fn create_with_first_post(&self, topic: &Topic, post: &Post) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO topics (id, forum_id, subject, author_id, created, updated,
                                views, post_count, last_post_id)
            VALUES ($1, $2, $3, $4, $5, NULL, 0, 0, NULL)
            "#,
        )
        .bind(topic.id.into_inner())
        .bind(topic.forum_id.into_inner())
        .bind(&topic.subject)
        .bind(topic.author_id.into_inner())
        .bind(topic.created)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        insert_post(&mut tx, post).await?;

        let now = Utc::now();
        propagate_post_insert(&mut tx, topic.id, post.id, post.author_id, now).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("UPDATE topics SET views = views + 1 WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(topic_not_found(id));
        }

        Ok(())
    }
}
