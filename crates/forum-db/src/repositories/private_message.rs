//! PostgreSQL implementation of PrivateMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::{InboxEntry, PrivateMessage};
use forum_core::error::DomainError;
use forum_core::traits::{PrivateMessageRepository, RepoResult};
use forum_core::value_objects::Snowflake;

use crate::models::{InboxMessageModel, PrivateMessageModel};

use super::error::{map_db_error, message_not_found};

const PM_COLUMNS: &str =
    "id, sender_id, conversation_id, parent_id, depth, subject, message, created";

/// PostgreSQL implementation of PrivateMessageRepository
#[derive(Clone)]
pub struct PgPrivateMessageRepository {
    pool: PgPool,
}

impl PgPrivateMessageRepository {
    /// Create a new PgPrivateMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrivateMessageRepository for PgPrivateMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<PrivateMessage>> {
        let result = sqlx::query_as::<_, PrivateMessageModel>(&format!(
            "SELECT {PM_COLUMNS} FROM private_messages WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(PrivateMessage::from))
    }

    #[instrument(skip(self, message, recipients))]
    async fn send(&self, message: &PrivateMessage, recipients: &[Snowflake]) -> RepoResult<()> {
        if recipients.is_empty() {
            return Err(DomainError::EmptyRecipients);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO private_messages (id, sender_id, conversation_id, parent_id, depth,
                                          subject, message, created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(message.conversation_id)
        .bind(message.parent_id.map(Snowflake::into_inner))
        .bind(message.depth)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.created)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // One inbox row per recipient, unread, in a single bulk insert
        let recipient_ids: Vec<i64> = recipients.iter().map(|r| r.into_inner()).collect();
        sqlx::query(
            r#"
            INSERT INTO inbox (message_id, recipient_id, is_read)
            SELECT $1, recipient, FALSE FROM unnest($2::bigint[]) AS recipient
            "#,
        )
        .bind(message.id.into_inner())
        .bind(&recipient_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn inbox(&self, user_id: Snowflake) -> RepoResult<Vec<(PrivateMessage, InboxEntry)>> {
        let results = sqlx::query_as::<_, InboxMessageModel>(
            r#"
            SELECT m.id, m.sender_id, m.conversation_id, m.parent_id, m.depth,
                   m.subject, m.message, m.created, i.recipient_id, i.is_read
            FROM private_messages m
            JOIN inbox i ON i.message_id = m.id
            WHERE i.recipient_id = $1
            ORDER BY m.id DESC
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<PrivateMessage>> {
        let results = sqlx::query_as::<_, PrivateMessageModel>(&format!(
            r#"
            SELECT {PM_COLUMNS}
            FROM private_messages
            WHERE sender_id = $1
            ORDER BY id DESC
            "#
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PrivateMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn conversation(
        &self,
        user_id: Snowflake,
        conversation_id: i64,
    ) -> RepoResult<Vec<PrivateMessage>> {
        let results = sqlx::query_as::<_, PrivateMessageModel>(&format!(
            r#"
            SELECT {PM_COLUMNS}
            FROM private_messages
            WHERE conversation_id = $1
              AND (sender_id = $2
                   OR id IN (SELECT message_id FROM inbox WHERE recipient_id = $2))
            ORDER BY id
            "#
        ))
        .bind(conversation_id)
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PrivateMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn recipients_of(&self, message_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT recipient_id FROM inbox WHERE message_id = $1 ORDER BY recipient_id",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, message_id: Snowflake, recipient_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE inbox SET is_read = TRUE WHERE message_id = $1 AND recipient_id = $2",
        )
        .bind(message_id.into_inner())
        .bind(recipient_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPrivateMessageRepository>();
    }
}
