#![allow(dead_code)]

use chrono::{DateTime, Utc};
use social_api::config::FeedConfig;
use social_api::db;
use social_api::models::AuthUser;
use social_api::services::{ConversationIndex, NotificationDispatcher, PostService};
use social_api::websocket::ConnectionRegistry;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Integration tests need a throwaway Postgres. Skip silently when none is
/// configured so the unit suite stays green on machines without one.
pub async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping integration test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");

    db::run_migrations(&pool).await.expect("apply migrations");

    Some(pool)
}

pub fn feed_config() -> FeedConfig {
    FeedConfig {
        default_limit: 5,
        max_limit: 50,
        cache_ttl_secs: 300,
    }
}

pub fn service(pool: &PgPool, registry: ConnectionRegistry) -> PostService {
    PostService::new(
        pool.clone(),
        ConversationIndex::new(pool.clone()),
        NotificationDispatcher::new(registry),
        feed_config(),
    )
}

pub fn user(name: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        profile_pic: None,
    }
}

pub async fn insert_profile(pool: &PgPool, user: &AuthUser) {
    sqlx::query("INSERT INTO users (id, full_name, profile_pic) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(&user.full_name)
        .bind(&user.profile_pic)
        .execute(pool)
        .await
        .expect("insert profile");
}

pub async fn insert_message(pool: &PgPool, sender: Uuid, receiver: Uuid) {
    sqlx::query("INSERT INTO messages (sender_id, receiver_id, body) VALUES ($1, $2, 'hi')")
        .bind(sender)
        .bind(receiver)
        .execute(pool)
        .await
        .expect("insert message");
}

/// Seed a post with an explicit timestamp so pagination tests are
/// deterministic regardless of insert latency.
pub async fn seed_post(
    pool: &PgPool,
    author: &AuthUser,
    content: &str,
    created_at: DateTime<Utc>,
) -> Uuid {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO posts (author_id, author_name, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id
        "#,
    )
    .bind(author.id)
    .bind(&author.full_name)
    .bind(content)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed post");

    row.0
}
