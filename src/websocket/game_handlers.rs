use actix_web_actors::ws;
use log::{info, warn};

use crate::game::rules::apply_move;
use crate::models::{ChatMessage, ClientMessage, GameUpdate, ServerMessage};
use crate::websocket::handler::GameWebSocket;

impl GameWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMessage::Move { game_id, index } => self.handle_move(game_id, index, ctx),
            ClientMessage::Chat { game_id, text } => self.handle_chat(game_id, text),
        }
    }

    /// Applies a move and fans the new state out to everyone watching the
    /// game. Failures go back to the sender only.
    pub fn handle_move(&mut self, game_id: String, index: i64, ctx: &mut ws::WebsocketContext<Self>) {
        let updated = {
            let mut games = self.app_state.games.lock().unwrap();
            let state = match games.get(&game_id) {
                Some(state) => state,
                None => {
                    self.send_error(ctx, "Game not found".to_string());
                    return;
                }
            };

            match apply_move(state, index) {
                Ok(updated) => {
                    games.insert(game_id.clone(), updated.clone());
                    updated
                }
                Err(err) => {
                    info!("Rejected move {} in game {}: {}", index, game_id, err);
                    self.send_error(ctx, err.to_string());
                    return;
                }
            }
        };

        info!("Move {} applied in game {}", index, game_id);
        let update = GameUpdate {
            game_id: game_id.clone(),
            state: updated,
        };
        self.broadcast_to_game(&game_id, &update);
    }

    /// Appends a chat line under the sender's role and fans it out.
    pub fn handle_chat(&mut self, game_id: String, text: String) {
        let role = match self.role {
            Some(role) => role,
            None => {
                // Every connection gets a role on join; an unregistered
                // sender is dropped rather than attributed to nobody.
                warn!("Dropping chat from unregistered connection {}", self.id);
                return;
            }
        };

        let message = ChatMessage {
            player: role.to_string(),
            text,
        };
        self.app_state.append_chat(&game_id, message.clone());

        self.broadcast_to_game(
            &game_id,
            &ServerMessage::Chat {
                player: message.player,
                text: message.text,
            },
        );
    }
}
