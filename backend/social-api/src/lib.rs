/// Social API
///
/// Handles the chat-scoped post feed, post interactions (likes, comments,
/// deletion), and the real-time fan-out of interaction events to a user's
/// conversation partners over WebSockets.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and the response envelope
/// - `models`: Data structures for posts, comments, and hydrated views
/// - `services`: Business logic layer (feed, interactions, fan-out)
/// - `db`: Database access layer and repositories
/// - `cache`: Advisory Redis cache for the conversation audience
/// - `websocket`: Connection registry, server events, session actor
/// - `middleware`: Bearer-token authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod websocket;

pub use config::Config;
pub use error::{AppError, Result};
