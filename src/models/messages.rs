use actix::Message;
use serde::{Deserialize, Serialize};

use crate::models::game_state::GameState;

/// Message sent from client to server over a game socket.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Move { game_id: String, index: i64 },
    #[serde(rename_all = "camelCase")]
    Chat { game_id: String, text: String },
}

/// Message sent from server to client over a game socket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Replayed to a newly joined connection only.
    ChatHistory { messages: Vec<ChatMessage> },
    Chat { player: String, text: String },
    Error { error: String },
}

/// One chat entry as stored in a game's history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub player: String,
    pub text: String,
}

/// Updated game state keyed by its id. Broadcast to every connection of a
/// game after a successful move, and returned by the newgame/move routes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub game_id: String,
    #[serde(flatten)]
    pub state: GameState,
}

/// Response body for `GET /api/game/{gameId}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStateEnvelope {
    pub game_state: GameState,
}

/// Response body for `GET /api/listgames`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListGamesResponse {
    pub games: Vec<String>,
}

/// Request body for `POST /api/move/{gameId}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MoveRequest {
    pub index: i64,
}

/// Plain success message, e.g. after deleting a game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error payload used by both the HTTP surface and the socket channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Message type for WebSocket communication between actors.
#[derive(Message)]
#[rtype(result = "()")]
pub struct GameSocketMessage(pub String);
