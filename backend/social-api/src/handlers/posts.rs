/// Post handlers - HTTP endpoints for the feed and post interactions
use crate::config::FeedConfig;
use crate::error::Result;
use crate::handlers::ApiResponse;
use crate::models::{AuthUser, FeedWindow};
use crate::services::{posts::NewPost, PostService};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct FeedParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Timestamp cursor; when present it wins over `page`
    pub after: Option<DateTime<Utc>>,
}

impl FeedParams {
    /// Resolve the two mutually exclusive pagination modes.
    ///
    /// Cursor mode when `after` is supplied, offset mode otherwise.
    /// `page` floors at 1 and `limit` is clamped to the configured cap.
    pub fn window(&self, config: &FeedConfig) -> FeedWindow {
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit);

        match self.after {
            Some(cursor) => FeedWindow::After { cursor, limit },
            None => {
                let page = self.page.unwrap_or(1).max(1);
                FeedWindow::Offset {
                    skip: (page - 1) * limit,
                    limit,
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

/// Audience-scoped feed, newest first
///
/// `GET /api/posts?page&limit&after`
pub async fn get_posts(
    service: web::Data<PostService>,
    user: AuthUser,
    query: web::Query<FeedParams>,
) -> Result<HttpResponse> {
    let window = query.window(service.feed_config());
    let posts = service.list_feed(user.id, window).await?;

    // The feed reflects a point-in-time social graph, safe to reuse briefly
    let cache_control = format!("private, max-age={}", service.feed_config().cache_ttl_secs);

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, cache_control))
        .json(ApiResponse::data(posts)))
}

/// Create a post
///
/// `POST /api/posts`
pub async fn create_post(
    service: web::Data<PostService>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post = service
        .create_post(
            &user,
            NewPost {
                content: req.content,
                image: req.image,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::data_with_message(
        post,
        "Post created successfully",
    )))
}

/// Toggle a like
///
/// `POST /api/posts/{post_id}/like`
pub async fn like_post(
    service: web::Data<PostService>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = service.toggle_like(*post_id, &user).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(outcome)))
}

/// Append a comment
///
/// `POST /api/posts/{post_id}/comments`
pub async fn comment_on_post(
    service: web::Data<PostService>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let post = service
        .add_comment(*post_id, &user, req.comment.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::data(post)))
}

/// Delete a post (author-only)
///
/// `DELETE /api/posts/{post_id}`
pub async fn delete_post(
    service: web::Data<PostService>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_post(*post_id, user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}
