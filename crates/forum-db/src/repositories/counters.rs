//! Save-time counter propagation
//!
//! Ordered steps that keep the denormalized counts and last-post pointers
//! consistent after a child entity is inserted or updated. Callers run them
//! inside the transaction of the triggering write, bottom-up:
//! post → topic + author profile → forum → each ancestor forum up to the root.
//!
//! Every count is recomputed from a live aggregate, never incremented in
//! memory, and every persist is a forced update: zero affected rows means
//! the row the counters belong to has vanished mid-transaction, which aborts
//! the whole unit.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use forum_core::traits::RepoResult;
use forum_core::value_objects::{Snowflake, TreePath};

use super::error::{forced_update_failed, map_db_error};

/// Refresh a topic after one of its posts was inserted
///
/// Sets `last_post_id` to the new post, recounts the topic's posts, and
/// stamps `updated` with the caller's clock so the same instant can flow
/// into the forum step.
pub async fn sync_topic_after_post(
    conn: &mut PgConnection,
    topic_id: Snowflake,
    last_post_id: Snowflake,
    updated: DateTime<Utc>,
) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE topics
        SET post_count = (SELECT COUNT(*) FROM posts WHERE topic_id = $1),
            last_post_id = $2,
            updated = $3
        WHERE id = $1
        "#,
    )
    .bind(topic_id.into_inner())
    .bind(last_post_id.into_inner())
    .bind(updated)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(forced_update_failed("topic", topic_id));
    }

    Ok(())
}

/// Recount the author's total posts on their profile
///
/// The profile row is created on first touch, mirroring the lazy
/// get-or-create accessor, then recounted with a forced update.
pub async fn sync_author_profile(conn: &mut PgConnection, author_id: Snowflake) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, post_count)
        VALUES ($1, 0)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(author_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET post_count = (SELECT COUNT(*) FROM posts WHERE author_id = $1)
        WHERE user_id = $1
        "#,
    )
    .bind(author_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(forced_update_failed("profile", author_id));
    }

    Ok(())
}

/// Refresh a forum after one of its topics was saved
///
/// Recounts topics and posts directly under the forum and copies the
/// topic's `updated` and `last_post_id` onto the forum.
pub async fn sync_forum_after_topic(
    conn: &mut PgConnection,
    forum_id: Snowflake,
    updated: DateTime<Utc>,
    last_post_id: Option<Snowflake>,
) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE forums
        SET topic_count = (SELECT COUNT(*) FROM topics WHERE forum_id = $1),
            post_count = (
                SELECT COUNT(*)
                FROM posts p
                JOIN topics t ON p.topic_id = t.id
                WHERE t.forum_id = $1
            ),
            updated = $2,
            last_post_id = $3
        WHERE id = $1
        "#,
    )
    .bind(forum_id.into_inner())
    .bind(updated)
    .bind(last_post_id.map(Snowflake::into_inner))
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(forced_update_failed("forum", forum_id));
    }

    Ok(())
}

/// Refresh a parent forum after one of its child forums was saved
///
/// The parent's `post_count` is recounted over its whole subtree via the
/// anchored path prefix; `updated` and `last_post_id` are copied from the
/// child. The parent's `topic_count` is deliberately left untouched, so a
/// grandparent never counts topics created in its grandchildren.
pub async fn sync_parent_after_forum(
    conn: &mut PgConnection,
    child_id: Snowflake,
    parent_id: Snowflake,
) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE forums parent
        SET post_count = (
                SELECT COUNT(*)
                FROM posts p
                JOIN topics t ON p.topic_id = t.id
                JOIN forums f ON t.forum_id = f.id
                WHERE f.id = parent.id
                   OR f.path LIKE parent.path || parent.id || '.%'
            ),
            updated = child.updated,
            last_post_id = child.last_post_id
        FROM forums child
        WHERE child.id = $1 AND parent.id = $2
        "#,
    )
    .bind(child_id.into_inner())
    .bind(parent_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(forced_update_failed("forum", parent_id));
    }

    Ok(())
}

/// Run the full bottom-up chain after a post insert
///
/// Returns the id of the forum that was refreshed, for callers that need it.
pub async fn propagate_post_insert(
    conn: &mut PgConnection,
    topic_id: Snowflake,
    post_id: Snowflake,
    author_id: Snowflake,
    now: DateTime<Utc>,
) -> RepoResult<Snowflake> {
    sync_topic_after_post(conn, topic_id, post_id, now).await?;
    sync_author_profile(conn, author_id).await?;

    let forum_id: i64 = sqlx::query_scalar("SELECT forum_id FROM topics WHERE id = $1")
        .bind(topic_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;
    let forum_id = Snowflake::new(forum_id);

    sync_forum_after_topic(conn, forum_id, now, Some(post_id)).await?;

    // The stored path lists every ancestor, so the rollup walks it
    // root-ward one hop at a time
    let raw_path: String = sqlx::query_scalar("SELECT path FROM forums WHERE id = $1")
        .bind(forum_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;
    let path = TreePath::parse(&raw_path)?;

    let mut child_id = forum_id;
    for ancestor_id in path.ancestor_ids().into_iter().rev() {
        sync_parent_after_forum(conn, child_id, ancestor_id).await?;
        child_id = ancestor_id;
    }

    Ok(forum_id)
}
