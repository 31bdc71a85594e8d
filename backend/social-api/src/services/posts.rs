/// Post service: feed retrieval and post interactions, plus the fan-out of
/// interaction events to the acting user's conversation partners.
use crate::config::FeedConfig;
use crate::db::{comment_repo, like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{
    AuthUser, CommentRow, CommentView, FeedWindow, LikeOutcome, PostView, PostWithAuthor,
    UserSummary,
};
use crate::services::{ConversationIndex, NotificationDispatcher};
use resilience::{retry_if, RetryPolicy};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
    index: ConversationIndex,
    dispatcher: NotificationDispatcher,
    retry: RetryPolicy,
    feed: FeedConfig,
}

/// Inputs for creating a post.
///
/// Neither field is required: the original product allowed fully empty
/// posts and that permissiveness is preserved deliberately.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub content: Option<String>,
    pub image: Option<String>,
}

impl PostService {
    pub fn new(
        pool: PgPool,
        index: ConversationIndex,
        dispatcher: NotificationDispatcher,
        feed: FeedConfig,
    ) -> Self {
        Self {
            pool,
            index,
            dispatcher,
            retry: RetryPolicy::default(),
            feed,
        }
    }

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed
    }

    /// Feed scoped to the requester's chat graph: only posts authored by
    /// users the requester has exchanged messages with, newest first.
    pub async fn list_feed(&self, requester: Uuid, window: FeedWindow) -> Result<Vec<PostView>> {
        let audience = self.index.audience_for(requester).await?;
        if audience.is_empty() {
            return Ok(vec![]);
        }

        let posts = post_repo::list_by_authors(&self.pool, &audience, &window).await?;
        self.hydrate(posts).await
    }

    /// Create a post under the acting user, snapshotting their display name,
    /// then push a `new_post` event to their conversation partners.
    pub async fn create_post(&self, author: &AuthUser, input: NewPost) -> Result<PostView> {
        let post = post_repo::create_post(
            &self.pool,
            author.id,
            &author.full_name,
            input.content.as_deref(),
            input.image.as_deref(),
        )
        .await?;

        let view = PostView {
            id: post.id,
            author: UserSummary::from(author),
            author_name: post.author_name,
            content: post.content,
            image: post.image,
            comments: vec![],
            likes: vec![],
            like_count: 0,
            created_at: post.created_at,
            updated_at: post.updated_at,
        };

        self.fan_out_new_post(author.id, &view).await;

        Ok(view)
    }

    /// Toggle the acting user's like on a post and push a `post_liked`
    /// event to their conversation partners.
    ///
    /// The toggle is one atomic statement, so re-running it after a
    /// transient pre-commit failure cannot lose or double-apply an update.
    pub async fn toggle_like(&self, post_id: Uuid, user: &AuthUser) -> Result<LikeOutcome> {
        let pool = self.pool.clone();
        let user_id = user.id;

        let result = retry_if(
            self.retry.clone(),
            |err: &AppError| err.is_transient(),
            move || {
                let pool = pool.clone();
                async move {
                    like_repo::toggle_like(&pool, post_id, user_id)
                        .await
                        .map_err(AppError::from)
                }
            },
        )
        .await?;

        if !result.found {
            return Err(AppError::NotFound("Post with id was not found".to_string()));
        }

        let outcome = LikeOutcome {
            post: post_id,
            likes: result.like_count,
            is_liked: result.is_liked,
        };

        self.fan_out_post_liked(user, &outcome).await;

        Ok(outcome)
    }

    /// Append a comment and return the post re-read with author and sender
    /// profiles resolved, so callers always see display data, not bare ids.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user: &AuthUser,
        comment: Option<&str>,
    ) -> Result<PostView> {
        let body = match comment {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return Err(AppError::Validation("Comment text is required".to_string())),
        };

        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post with id was not found".to_string()))?;

        // One key per request: a retried insert becomes a no-op instead of
        // a duplicate comment.
        let idempotency_key = Uuid::new_v4().to_string();

        let pool = self.pool.clone();
        let sender_id = user.id;
        retry_if(
            self.retry.clone(),
            |err: &AppError| err.is_transient(),
            move || {
                let pool = pool.clone();
                let body = body.clone();
                let idempotency_key = idempotency_key.clone();
                async move {
                    comment_repo::create_comment(&pool, post_id, sender_id, &body, &idempotency_key)
                        .await
                        .map_err(AppError::from)
                }
            },
        )
        .await?;

        self.fetch_view(post_id).await
    }

    /// Delete a post. Author-only; comments and likes go with it.
    pub async fn delete_post(&self, post_id: Uuid, requester: Uuid) -> Result<()> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post with id was not found".to_string()))?;

        if post.author_id != requester {
            return Err(AppError::Forbidden(
                "You can't delete this post, you are not the author".to_string(),
            ));
        }

        let pool = self.pool.clone();
        retry_if(
            self.retry.clone(),
            |err: &AppError| err.is_transient(),
            move || {
                let pool = pool.clone();
                async move {
                    post_repo::delete_post(&pool, post_id)
                        .await
                        .map_err(AppError::from)
                }
            },
        )
        .await?;

        Ok(())
    }

    /// A single post, fully hydrated
    pub async fn fetch_view(&self, post_id: Uuid) -> Result<PostView> {
        let post = post_repo::find_post_with_author(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post with id was not found".to_string()))?;

        let mut views = self.hydrate(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("post vanished during hydration".to_string()))
    }

    /// Attach comments and likes to post rows, preserving their order
    async fn hydrate(&self, posts: Vec<PostWithAuthor>) -> Result<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let mut comments_by_post: HashMap<Uuid, Vec<CommentRow>> = HashMap::new();
        for comment in comment_repo::comments_for_posts(&self.pool, &ids).await? {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(comment);
        }

        let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (post_id, user_id) in like_repo::likes_for_posts(&self.pool, &ids).await? {
            likes_by_post.entry(post_id).or_default().push(user_id);
        }

        let views = posts
            .into_iter()
            .map(|post| {
                let author = post.author_summary();
                let comments = comments_by_post
                    .remove(&post.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(CommentView::from)
                    .collect();
                let likes = likes_by_post.remove(&post.id).unwrap_or_default();

                PostView {
                    id: post.id,
                    author,
                    author_name: post.author_name,
                    content: post.content,
                    image: post.image,
                    like_count: likes.len() as i64,
                    likes,
                    comments,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                }
            })
            .collect();

        Ok(views)
    }

    /// Best-effort fan-out; a failed audience lookup downgrades to a log
    /// line and never fails the originating request.
    async fn fan_out_new_post(&self, actor: Uuid, view: &PostView) {
        match self.index.audience_for(actor).await {
            Ok(audience) => self.dispatcher.notify_new_post(view, &audience).await,
            Err(err) => {
                tracing::warn!(post_id = %view.id, "skipping new-post fan-out: {}", err);
            }
        }
    }

    async fn fan_out_post_liked(&self, actor: &AuthUser, outcome: &LikeOutcome) {
        match self.index.audience_for(actor.id).await {
            Ok(audience) => {
                self.dispatcher
                    .notify_post_liked(outcome, UserSummary::from(actor), &audience)
                    .await
            }
            Err(err) => {
                tracing::warn!(post_id = %outcome.post, "skipping like fan-out: {}", err);
            }
        }
    }
}
