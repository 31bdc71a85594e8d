/// WebSocket handlers: the upgrade endpoint and connection status
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::handlers::ApiResponse;
use crate::middleware::TokenAuth;
use crate::websocket::session::PushEvent;
use crate::websocket::{ConnectionRegistry, WsSession};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Browsers cannot set headers on upgrade requests, so the bearer
    /// token is accepted as a query parameter too
    pub token: Option<String>,
}

/// Upgrade to a WebSocket session for the authenticated user.
///
/// Endpoint: `GET /ws?token=...`
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    registry: web::Data<ConnectionRegistry>,
    token_auth: web::Data<TokenAuth>,
    query: web::Query<WsParams>,
) -> Result<HttpResponse, Error> {
    let token = query.into_inner().token.or_else(|| {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    });

    let user = match token.as_deref().map(|t| token_auth.decode(t)) {
        Some(Ok(user)) => user,
        _ => {
            tracing::warn!("WebSocket connection rejected: missing or invalid token");
            return Ok(HttpResponse::Unauthorized().finish());
        }
    };

    let (channel_id, mut rx) = registry.register(user.id).await;
    let session = WsSession::new(user.id, channel_id, registry.get_ref().clone());

    let (addr, resp) = ws::WsResponseBuilder::new(session, &req, stream).start_with_addr()?;

    // Bridge the registry channel to the session actor. The sender is
    // dropped on unregister, which ends this task with the session.
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            addr.do_send(PushEvent(payload));
        }
    });

    Ok(resp)
}

/// Connection status for a user
///
/// Endpoint: `GET /api/ws/status/{user_id}`
pub async fn ws_status(
    path: web::Path<Uuid>,
    registry: web::Data<ConnectionRegistry>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let channel_count = registry.channel_count(user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::data(json!({
        "user_id": user_id,
        "connected": channel_count > 0,
        "channel_count": channel_count,
    }))))
}
