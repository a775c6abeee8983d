use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ClientMessage, GameSocketMessage, Role, ServerMessage};
use crate::state::AppState;

/// WebSocket actor for a single connection to one game.
pub struct GameWebSocket {
    pub id: String,
    pub game_id: String,
    pub role: Option<Role>,
    pub app_state: web::Data<AppState>,
}

impl Actor for GameWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        self.app_state
            .sessions
            .lock()
            .unwrap()
            .insert(self.id.clone(), ctx.address());

        let role = self
            .app_state
            .register_connection(&self.game_id, &self.id);
        self.role = Some(role);
        info!(
            "Connection {} joined game {} as {}",
            self.id, self.game_id, role
        );

        // Replay the stored chat to the newcomer only.
        let messages = self.app_state.chat_history_for(&self.game_id);
        self.send_message(ctx, &ServerMessage::ChatHistory { messages });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.app_state.remove_connection(&self.game_id, &self.id);
        self.app_state.sessions.lock().unwrap().remove(&self.id);
        info!("Connection {} left game {}", self.id, self.game_id);
        Running::Stop
    }
}

impl Handler<GameSocketMessage> for GameWebSocket {
    type Result = ();

    fn handle(&mut self, msg: GameSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send_error(ctx, format!("Invalid message format: {}", e));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send_error(ctx, "Binary messages are not supported".to_string());
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection {} closed: {:?}", self.id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl GameWebSocket {
    /// Serializes `message` and sends it to this connection only.
    pub fn send_message<T: Serialize>(&self, ctx: &mut ws::WebsocketContext<Self>, message: &T) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Error serializing message: {}", e),
        }
    }

    pub fn send_error(&self, ctx: &mut ws::WebsocketContext<Self>, error: String) {
        self.send_message(ctx, &ServerMessage::Error { error });
    }

    /// Publishes `message` to every connection registered for `game_id`.
    /// The subscriber list and session map are snapshotted under scoped
    /// locks; delivery goes through actor mailboxes, so a dead connection
    /// never stops the rest of the batch.
    pub fn broadcast_to_game<T: Serialize>(&self, game_id: &str, message: &T) {
        let connection_ids;
        let sessions_copy;

        {
            let connections = self.app_state.connections.lock().unwrap();
            connection_ids = match connections.get(game_id) {
                Some(ids) => ids.clone(),
                None => {
                    warn!("No connections found for game {}", game_id);
                    return;
                }
            };

            let sessions = self.app_state.sessions.lock().unwrap();
            sessions_copy = sessions.clone();
        }

        // Serialize the message once
        let message_str = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error serializing message: {}", e);
                return;
            }
        };

        info!(
            "Broadcasting to {} connections of game {}",
            connection_ids.len(),
            game_id
        );
        for conn_id in connection_ids {
            if let Some(addr) = sessions_copy.get(&conn_id) {
                addr.do_send(GameSocketMessage(message_str.clone()));
            } else {
                warn!("Session not found for connection {}", conn_id);
            }
        }
    }
}

/// WebSocket connection handler. The game id is taken from the path; the
/// role is assigned when the actor starts.
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = path.into_inner();
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection {} for game {}", id, game_id);

    let ws = GameWebSocket {
        id,
        game_id,
        role: None,
        app_state,
    };

    ws::start(ws, &req, stream)
}
