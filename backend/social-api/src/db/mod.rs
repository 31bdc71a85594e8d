pub mod comment_repo;
pub mod like_repo;
pub mod message_repo;
pub mod post_repo;

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

/// Create the shared connection pool from the configured limits
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

// Embed SQL migrations at compile time for deterministic startup
const MIG_0001: &str = include_str!("../../migrations/0001_create_users.sql");
const MIG_0002: &str = include_str!("../../migrations/0002_create_messages.sql");
const MIG_0003: &str = include_str!("../../migrations/0003_create_posts.sql");
const MIG_0004: &str = include_str!("../../migrations/0004_create_post_likes.sql");
const MIG_0005: &str = include_str!("../../migrations/0005_create_post_comments.sql");

/// Apply embedded migrations in order. Statements are idempotent
/// (`IF NOT EXISTS`), so re-running at every startup is safe.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (i, sql) in [MIG_0001, MIG_0002, MIG_0003, MIG_0004, MIG_0005]
        .into_iter()
        .enumerate()
    {
        let label = i + 1;
        // Executing the raw string keeps the simple query protocol, which
        // allows the multi-statement migration files.
        pool.execute(sql).await.map_err(|e| {
            tracing::error!(migration = %label, error = %e, "migration failed");
            e
        })?;
        tracing::debug!(migration = %label, "migration applied");
    }
    Ok(())
}
