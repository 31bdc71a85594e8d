/// Server-pushed WebSocket event types
use crate::models::{LikeOutcome, PostView, UserSummary};
use serde::{Deserialize, Serialize};

/// Events pushed to connected clients.
///
/// Comment events are not part of the protocol yet.
/// TODO: add a `new_comment` variant once the client protocol grows one and
/// wire it through `NotificationDispatcher`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A conversation partner published a post
    NewPost { post: PostView },

    /// A conversation partner toggled a like
    PostLiked {
        post: LikeOutcome,
        liked_by: UserSummary,
    },

    /// Connection established confirmation
    Connected { timestamp: i64 },
}

impl ServerEvent {
    pub fn new_post(post: PostView) -> Self {
        ServerEvent::NewPost { post }
    }

    pub fn post_liked(outcome: LikeOutcome, liked_by: UserSummary) -> Self {
        ServerEvent::PostLiked {
            post: outcome,
            liked_by,
        }
    }

    pub fn connected() -> Self {
        ServerEvent::Connected {
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Event kind for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::NewPost { .. } => "new_post",
            ServerEvent::PostLiked { .. } => "post_liked",
            ServerEvent::Connected { .. } => "connected",
        }
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the wire format
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn summary() -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            full_name: "Ada Lovelace".to_string(),
            profile_pic: None,
        }
    }

    #[test]
    fn test_post_liked_round_trip() {
        let event = ServerEvent::post_liked(
            LikeOutcome {
                post: Uuid::new_v4(),
                likes: 1,
                is_liked: true,
            },
            summary(),
        );

        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"post_liked\""));

        let decoded = ServerEvent::from_json(&json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_connected_is_tagged() {
        let json = ServerEvent::connected().to_json().unwrap();
        assert!(json.contains("\"type\":\"connected\""));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ServerEvent::connected().kind(), "connected");
        assert_eq!(
            ServerEvent::post_liked(
                LikeOutcome {
                    post: Uuid::new_v4(),
                    likes: 0,
                    is_liked: false,
                },
                summary(),
            )
            .kind(),
            "post_liked"
        );
    }
}
