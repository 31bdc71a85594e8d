/// Notification dispatcher: pushes interaction events to the live channels
/// of a recipient set.
///
/// Delivery is strictly best-effort. Recipients without an open channel are
/// skipped, send failures are swallowed, and nothing is queued or persisted
/// for offline users — a dispatch can never fail the originating request.
use crate::models::{LikeOutcome, PostView, UserSummary};
use crate::websocket::{ConnectionRegistry, ServerEvent};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationDispatcher {
    registry: ConnectionRegistry,
}

impl NotificationDispatcher {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Push a `new_post` event to every connected recipient
    pub async fn notify_new_post(&self, post: &PostView, recipients: &[Uuid]) {
        self.dispatch(ServerEvent::new_post(post.clone()), recipients)
            .await;
    }

    /// Push a `post_liked` event to every connected recipient
    pub async fn notify_post_liked(
        &self,
        outcome: &LikeOutcome,
        liked_by: UserSummary,
        recipients: &[Uuid],
    ) {
        self.dispatch(ServerEvent::post_liked(outcome.clone(), liked_by), recipients)
            .await;
    }

    // TODO: notify_new_comment once the client protocol gains a comment
    // event (see ServerEvent).

    async fn dispatch(&self, event: ServerEvent, recipients: &[Uuid]) {
        let kind = event.kind();
        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("failed to serialize {} event: {}", kind, err);
                return;
            }
        };

        let delivered = self.registry.send_to_many(recipients, &payload).await;
        tracing::debug!(
            recipients = recipients.len(),
            delivered,
            "dispatched {} event",
            kind
        );
    }
}
