/// Real-time delivery layer: connection registry, server events, and the
/// WebSocket session actor.
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

pub mod events;
pub mod session;

pub use events::ServerEvent;
pub use session::WsSession;

/// Unique identifier for one live WebSocket channel.
///
/// A user may hold several channels at once (multiple tabs or devices); the
/// id lets a closing session remove exactly its own entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(Uuid);

impl ChannelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

/// One live delivery channel
struct Channel {
    id: ChannelId,
    sender: UnboundedSender<String>,
}

/// Live delivery channels per user.
///
/// Entries are routing hints, not a source of truth: a channel may go stale
/// between a read and a send, in which case the send error is swallowed and
/// the channel pruned on the spot.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    // user_id -> list of live channels
    inner: Arc<RwLock<HashMap<Uuid, Vec<Channel>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new channel for `user_id`.
    ///
    /// Returns the channel id used for cleanup and the receiving half that
    /// the session forwards to its socket.
    pub async fn register(&self, user_id: Uuid) -> (ChannelId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let id = ChannelId::new();

        let mut guard = self.inner.write().await;
        guard
            .entry(user_id)
            .or_default()
            .push(Channel { id, sender: tx });

        tracing::debug!(
            %user_id,
            channels = guard.get(&user_id).map(|v| v.len()).unwrap_or(0),
            "registered WebSocket channel"
        );

        (id, rx)
    }

    /// Remove a single channel. The user's entry disappears with its last
    /// channel so the map does not accumulate empty vectors.
    pub async fn unregister(&self, user_id: Uuid, channel_id: ChannelId) {
        let mut guard = self.inner.write().await;
        if let Some(channels) = guard.get_mut(&user_id) {
            channels.retain(|c| c.id != channel_id);
            if channels.is_empty() {
                guard.remove(&user_id);
            }
        }
    }

    /// Deliver `payload` to every live channel of `user_id`, pruning dead
    /// channels as it goes. Returns the number of channels reached.
    pub async fn send_to_user(&self, user_id: Uuid, payload: &str) -> usize {
        let mut guard = self.inner.write().await;
        let Some(channels) = guard.get_mut(&user_id) else {
            return 0;
        };

        channels.retain(|c| c.sender.send(payload.to_owned()).is_ok());
        let delivered = channels.len();
        if channels.is_empty() {
            guard.remove(&user_id);
        }

        delivered
    }

    /// Deliver to each recipient that has at least one live channel;
    /// recipients without channels are skipped silently.
    pub async fn send_to_many(&self, recipients: &[Uuid], payload: &str) -> usize {
        let mut delivered = 0;
        for user_id in recipients {
            delivered += self.send_to_user(*user_id, payload).await;
        }
        delivered
    }

    /// Number of live channels for a user
    pub async fn channel_count(&self, user_id: Uuid) -> usize {
        let guard = self.inner.read().await;
        guard.get(&user_id).map(|v| v.len()).unwrap_or(0)
    }

    /// Number of users with at least one live channel
    pub async fn connected_users(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }
}
