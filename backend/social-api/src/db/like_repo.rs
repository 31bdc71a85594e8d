use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Result of an atomic like toggle
#[derive(Debug, Clone, Copy)]
pub struct ToggleResult {
    /// Whether the post existed at all
    pub found: bool,
    /// Membership after the toggle
    pub is_liked: bool,
    /// Like count after the toggle
    pub like_count: i64,
}

/// Toggle a user's like on a post in a single statement.
///
/// The leading UPDATE locks the post row, serializing concurrent toggles on
/// the same post, and refreshes `updated_at`. Insert and delete are
/// conditional on each other, so membership flips exactly once per call.
/// Data-modifying CTEs are invisible to the trailing count, hence the
/// explicit delta arithmetic.
pub async fn toggle_like(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<ToggleResult, sqlx::Error> {
    let row = sqlx::query(
        r#"
        WITH target AS (
            UPDATE posts SET updated_at = NOW()
            WHERE id = $1
            RETURNING id
        ), ins AS (
            INSERT INTO post_likes (post_id, user_id)
            SELECT id, $2 FROM target
            ON CONFLICT (post_id, user_id) DO NOTHING
            RETURNING post_id
        ), del AS (
            DELETE FROM post_likes
            WHERE post_id = $1 AND user_id = $2
              AND EXISTS (SELECT 1 FROM target)
              AND NOT EXISTS (SELECT 1 FROM ins)
            RETURNING post_id
        )
        SELECT
            EXISTS (SELECT 1 FROM target) AS found,
            EXISTS (SELECT 1 FROM ins) AS is_liked,
            (SELECT COUNT(*) FROM post_likes WHERE post_id = $1)
              + (SELECT COUNT(*) FROM ins)
              - (SELECT COUNT(*) FROM del) AS like_count
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ToggleResult {
        found: row.get("found"),
        is_liked: row.get("is_liked"),
        like_count: row.get("like_count"),
    })
}

/// Likers for multiple posts in one round trip, oldest like first
pub async fn likes_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, Uuid)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT post_id, user_id
        FROM post_likes
        WHERE post_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let likes = rows
        .into_iter()
        .map(|row| {
            let post_id: Uuid = row.get("post_id");
            let user_id: Uuid = row.get("user_id");
            (post_id, user_id)
        })
        .collect();

    Ok(likes)
}
