/// Advisory Redis cache for conversation audiences.
///
/// The audience only changes when a user starts a new conversation, so a
/// short TTL is an acceptable freshness window. Every cache failure degrades
/// silently to the database query; the cache is never a source of truth.
use redis::aio::ConnectionManager;
use uuid::Uuid;

#[derive(Clone)]
pub struct AudienceCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl AudienceCache {
    /// Connect to Redis; the caller decides whether a failure is fatal
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_secs })
    }

    fn key(user_id: Uuid) -> String {
        format!("audience:{}", user_id)
    }

    pub async fn get(&self, user_id: Uuid) -> Option<Vec<Uuid>> {
        let mut conn = self.conn.clone();
        match redis::cmd("GET")
            .arg(Self::key(user_id))
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(%user_id, "audience cache read failed: {}", err);
                None
            }
        }
    }

    pub async fn put(&self, user_id: Uuid, audience: &[Uuid]) {
        let payload = match serde_json::to_string(audience) {
            Ok(payload) => payload,
            Err(_) => return,
        };

        let mut conn = self.conn.clone();
        if let Err(err) = redis::cmd("SETEX")
            .arg(Self::key(user_id))
            .arg(self.ttl_secs)
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await
        {
            tracing::debug!(%user_id, "audience cache write failed: {}", err);
        }
    }
}
