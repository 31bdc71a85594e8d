/// Data models for the social API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Acting user resolved by the auth middleware from the bearer token.
///
/// The auth service owns identity; these fields are trusted as-is.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub full_name: String,
    pub profile_pic: Option<String>,
}

/// Display profile embedded in hydrated responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub profile_pic: Option<String>,
}

impl From<&AuthUser> for UserSummary {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            profile_pic: user.profile_pic.clone(),
        }
    }
}

/// Post row as stored
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post row joined with the author's current display profile.
///
/// `author_name` stays the creation-time snapshot; the joined profile is
/// what clients render next to the post today.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_full_name: String,
    pub author_profile_pic: Option<String>,
}

impl PostWithAuthor {
    pub fn author_summary(&self) -> UserSummary {
        UserSummary {
            id: self.author_id,
            full_name: self.author_full_name.clone(),
            profile_pic: self.author_profile_pic.clone(),
        }
    }
}

/// Comment row joined with the sender's display profile
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_pic: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Fully hydrated post returned by the feed and interaction endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: UserSummary,
    pub author_name: String,
    pub content: Option<String>,
    pub image: Option<String>,
    pub comments: Vec<CommentView>,
    pub likes: Vec<Uuid>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub sender: UserSummary,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            sender: UserSummary {
                id: row.sender_id,
                full_name: row.sender_name,
                profile_pic: row.sender_pic,
            },
            comment: row.body,
            created_at: row.created_at,
        }
    }
}

/// Outcome of a like toggle, reflecting the post-toggle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub post: Uuid,
    pub likes: i64,
    pub is_liked: bool,
}

/// Resolved feed window: exactly one of the two pagination modes.
///
/// Cursor mode wins whenever `after` is supplied; offset mode otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedWindow {
    Offset { skip: i64, limit: i64 },
    After { cursor: DateTime<Utc>, limit: i64 },
}

impl FeedWindow {
    pub fn limit(&self) -> i64 {
        match self {
            FeedWindow::Offset { limit, .. } => *limit,
            FeedWindow::After { limit, .. } => *limit,
        }
    }
}
