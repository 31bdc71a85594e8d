use crate::models::CommentRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Append a comment to a post, keyed by a per-request idempotency key.
///
/// A retried request hits the unique constraint and inserts nothing, so the
/// comment is appended at most once. Returns whether a row was written.
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    sender_id: Uuid,
    body: &str,
    idempotency_key: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO post_comments (post_id, sender_id, body, idempotency_key)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (idempotency_key) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(sender_id)
    .bind(body)
    .bind(idempotency_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Comments for multiple posts in one round trip, insertion order preserved,
/// with the sender profile joined in
pub async fn comments_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<CommentRow>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.post_id, c.sender_id,
               COALESCE(u.full_name, 'Unknown') AS sender_name,
               u.profile_pic AS sender_pic,
               c.body, c.created_at
        FROM post_comments c
        LEFT JOIN users u ON u.id = c.sender_id
        WHERE c.post_id = ANY($1)
        ORDER BY c.created_at ASC, c.seq ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Count comments on a post
pub async fn count_comments_by_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM post_comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}
