use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use social_api::cache::AudienceCache;
use social_api::handlers;
use social_api::middleware::{JwtAuthMiddleware, TokenAuth};
use social_api::services::{ConversationIndex, NotificationDispatcher, PostService};
use social_api::websocket::ConnectionRegistry;
use social_api::{db, Config};
use sqlx::PgPool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "social-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "social-api"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Social API
///
/// Serves the chat-scoped post feed and post interactions, and pushes
/// real-time interaction events to each user's conversation partners.
///
/// # Routes
///
/// - `GET    /api/posts` - paginated feed scoped to the requester's chat graph
/// - `POST   /api/posts` - create a post
/// - `POST   /api/posts/{post_id}/like` - toggle a like
/// - `POST   /api/posts/{post_id}/comments` - append a comment
/// - `DELETE /api/posts/{post_id}` - delete a post (author-only)
/// - `GET    /ws` - WebSocket upgrade for real-time events
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting social-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    db::run_migrations(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations failed: {e}")))?;

    tracing::info!("Connected to database, schema is current");

    // Redis is advisory only; run without the audience cache when it is down
    let audience_cache =
        match AudienceCache::connect(&config.cache.url, config.feed.cache_ttl_secs).await {
            Ok(cache) => {
                tracing::info!("Audience cache connected");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!("Audience cache unavailable, continuing without it: {}", e);
                None
            }
        };

    let index = match audience_cache {
        Some(cache) => ConversationIndex::with_cache(pool.clone(), cache),
        None => ConversationIndex::new(pool.clone()),
    };

    let registry = ConnectionRegistry::new();
    let dispatcher = NotificationDispatcher::new(registry.clone());
    let service = PostService::new(pool.clone(), index, dispatcher, config.feed.clone());
    let token_auth = TokenAuth::new(&config.auth.jwt_secret);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(token_auth.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/api/health", web::get().to(health_summary))
            .route("/api/health/live", web::get().to(liveness_check))
            // WebSocket upgrade authenticates via query token, not headers
            .route("/ws", web::get().to(handlers::ws_connect))
            .service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware)
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::get_posts))
                                    .route(web::post().to(handlers::create_post)),
                            )
                            .route("/{post_id}/like", web::post().to(handlers::like_post))
                            .route(
                                "/{post_id}/comments",
                                web::post().to(handlers::comment_on_post),
                            )
                            .service(
                                web::resource("/{post_id}")
                                    .route(web::delete().to(handlers::delete_post)),
                            ),
                    )
                    .route("/ws/status/{user_id}", web::get().to(handlers::ws_status)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
