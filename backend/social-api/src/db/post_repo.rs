use crate::models::{FeedWindow, Post, PostWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new post, snapshotting the author's display name
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    author_name: &str,
    content: Option<&str>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, author_name, content, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, author_name, content, image, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(author_name)
    .bind(content)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, author_name, content, image, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with the author profile joined in.
///
/// The profile falls back to the stored name snapshot when the auth service
/// has not (yet) replicated the user row.
pub async fn find_post_with_author(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.author_id, p.author_name, p.content, p.image,
               p.created_at, p.updated_at,
               COALESCE(u.full_name, p.author_name) AS author_full_name,
               u.profile_pic AS author_profile_pic
        FROM posts p
        LEFT JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Posts authored by any of `authors`, newest first, windowed by either
/// offset or created-at cursor.
pub async fn list_by_authors(
    pool: &PgPool,
    authors: &[Uuid],
    window: &FeedWindow,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = match window {
        FeedWindow::Offset { skip, limit } => {
            sqlx::query_as::<_, PostWithAuthor>(
                r#"
                SELECT p.id, p.author_id, p.author_name, p.content, p.image,
                       p.created_at, p.updated_at,
                       COALESCE(u.full_name, p.author_name) AS author_full_name,
                       u.profile_pic AS author_profile_pic
                FROM posts p
                LEFT JOIN users u ON u.id = p.author_id
                WHERE p.author_id = ANY($1)
                ORDER BY p.created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(authors)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await?
        }
        FeedWindow::After { cursor, limit } => {
            sqlx::query_as::<_, PostWithAuthor>(
                r#"
                SELECT p.id, p.author_id, p.author_name, p.content, p.image,
                       p.created_at, p.updated_at,
                       COALESCE(u.full_name, p.author_name) AS author_full_name,
                       u.profile_pic AS author_profile_pic
                FROM posts p
                LEFT JOIN users u ON u.id = p.author_id
                WHERE p.author_id = ANY($1) AND p.created_at > $2
                ORDER BY p.created_at DESC
                LIMIT $3
                "#,
            )
            .bind(authors)
            .bind(cursor)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(posts)
}

/// Delete a post permanently. Embedded likes and comments go with it via
/// `ON DELETE CASCADE`. Returns the number of rows removed.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
