/// Conversation index: who has this user ever exchanged messages with.
///
/// The answer scopes both the feed and the notification fan-out. It is
/// recomputed per interaction from message history, with an advisory Redis
/// cache in front sized to the feed freshness window.
use crate::cache::AudienceCache;
use crate::db::message_repo;
use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ConversationIndex {
    pool: PgPool,
    cache: Option<AudienceCache>,
}

impl ConversationIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: AudienceCache) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    /// Distinct conversation partners of `user_id`, never including
    /// `user_id` itself. Empty when the user has no conversations.
    pub async fn audience_for(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(user_id).await {
                return Ok(hit);
            }
        }

        let partners = message_repo::conversation_partners(&self.pool, user_id).await?;

        if let Some(cache) = &self.cache {
            cache.put(user_id, &partners).await;
        }

        Ok(partners)
    }
}
