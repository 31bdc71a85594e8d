/// WebSocket session actor.
///
/// One actor per live connection. The actor owns the heartbeat and pushes
/// events it receives from the connection registry down the socket; on
/// close it removes exactly its own channel from the registry.
use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::{ChannelId, ConnectionRegistry, ServerEvent};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound event forwarded from the registry to this session's socket
#[derive(ActixMessage)]
#[rtype(result = "()")]
pub struct PushEvent(pub String);

pub struct WsSession {
    user_id: Uuid,
    channel_id: ChannelId,
    registry: ConnectionRegistry,
    hb: Instant,
}

impl WsSession {
    pub fn new(user_id: Uuid, channel_id: ChannelId, registry: ConnectionRegistry) -> Self {
        Self {
            user_id,
            channel_id,
            registry,
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!(user_id = %act.user_id, "WebSocket heartbeat timed out, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.user_id, "WebSocket session started");
        self.hb(ctx);

        if let Ok(payload) = ServerEvent::connected().to_json() {
            ctx.text(payload);
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.user_id, "WebSocket session stopped");

        let registry = self.registry.clone();
        let user_id = self.user_id;
        let channel_id = self.channel_id;
        actix::spawn(async move {
            registry.unregister(user_id, channel_id).await;
        });
    }
}

impl Handler<PushEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: PushEvent, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(_)) => {
                // This channel is push-only; clients have nothing to say yet
                tracing::debug!(user_id = %self.user_id, "ignoring inbound WebSocket text");
            }
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!(user_id = %self.user_id, "binary WebSocket messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                tracing::warn!(user_id = %self.user_id, "WebSocket protocol error: {}", err);
                ctx.stop();
            }
            _ => {}
        }
    }
}
