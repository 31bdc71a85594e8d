use sqlx::PgPool;
use uuid::Uuid;

/// Distinct users the given user has exchanged direct messages with.
///
/// Self-messages are excluded so a user never shows up in their own
/// audience. Backed by the per-participant indexes on `messages`.
pub async fn conversation_partners(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT DISTINCT
            CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS partner_id
        FROM messages
        WHERE (sender_id = $1 OR receiver_id = $1)
          AND sender_id <> receiver_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}
