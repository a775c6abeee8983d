use std::collections::HashMap;
use std::sync::Mutex;

use actix::Addr;
use uuid::Uuid;

use crate::models::{ChatMessage, GameState, Role};
use crate::websocket::GameWebSocket;

/// Application state shared between requests and connections. One instance
/// is constructed in `main` and handed to every handler; nothing here
/// outlives the process.
pub struct AppState {
    /// Game id -> game state.
    pub games: Mutex<HashMap<String, GameState>>,
    /// Game id -> connection ids, in join order.
    pub connections: Mutex<HashMap<String, Vec<String>>>,
    /// Connection id -> actor address, for delivery.
    pub sessions: Mutex<HashMap<String, Addr<GameWebSocket>>>,
    /// Game id -> chat messages, in arrival order.
    pub chat_history: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            games: Mutex::new(HashMap::new()),
            connections: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            chat_history: Mutex::new(HashMap::new()),
        }
    }

    /// Stores a blank game under a fresh id and returns both.
    pub fn create_game(&self) -> (String, GameState) {
        let game_id = Uuid::new_v4().to_string();
        let state = GameState::new();
        self.games
            .lock()
            .unwrap()
            .insert(game_id.clone(), state.clone());
        (game_id, state)
    }

    /// Records a connection under a game and derives its role from the
    /// current live count. Also makes sure the game has a chat history
    /// entry to replay.
    pub fn register_connection(&self, game_id: &str, conn_id: &str) -> Role {
        let mut connections = self.connections.lock().unwrap();
        let conn_list = connections.entry(game_id.to_string()).or_default();
        let role = Role::from_join_order(conn_list.len());
        conn_list.push(conn_id.to_string());

        self.chat_history
            .lock()
            .unwrap()
            .entry(game_id.to_string())
            .or_default();

        role
    }

    /// Drops a connection from its game's list. The role assignment dies
    /// with the actor; nothing else changes.
    pub fn remove_connection(&self, game_id: &str, conn_id: &str) {
        let mut connections = self.connections.lock().unwrap();
        if let Some(conn_list) = connections.get_mut(game_id) {
            conn_list.retain(|id| id != conn_id);
        }
    }

    pub fn append_chat(&self, game_id: &str, message: ChatMessage) {
        self.chat_history
            .lock()
            .unwrap()
            .entry(game_id.to_string())
            .or_default()
            .push(message);
    }

    pub fn chat_history_for(&self, game_id: &str) -> Vec<ChatMessage> {
        self.chat_history
            .lock()
            .unwrap()
            .get(game_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Role};

    #[test]
    fn create_game_stores_a_blank_state_under_a_unique_id() {
        let state = AppState::new();
        let (first_id, first) = state.create_game();
        let (second_id, _) = state.create_game();

        assert_ne!(first_id, second_id);
        assert_eq!(first, GameState::new());
        assert_eq!(state.games.lock().unwrap().len(), 2);
    }

    #[test]
    fn connections_get_roles_in_join_order() {
        let state = AppState::new();
        assert_eq!(
            state.register_connection("game", "a"),
            Role::Player(Player::X)
        );
        assert_eq!(
            state.register_connection("game", "b"),
            Role::Player(Player::O)
        );
        assert_eq!(state.register_connection("game", "c"), Role::Spectator(1));
        assert_eq!(state.register_connection("game", "d"), Role::Spectator(2));
    }

    #[test]
    fn reconnecting_rederives_the_role_from_the_live_count() {
        let state = AppState::new();
        state.register_connection("game", "a");
        state.register_connection("game", "b");
        state.register_connection("game", "c");

        // X leaves; the next join sees two live connections and becomes a
        // spectator rather than inheriting the freed X slot.
        state.remove_connection("game", "a");
        assert_eq!(state.register_connection("game", "e"), Role::Spectator(1));
    }

    #[test]
    fn remove_connection_only_touches_the_given_game() {
        let state = AppState::new();
        state.register_connection("one", "a");
        state.register_connection("two", "a");
        state.remove_connection("one", "a");

        let connections = state.connections.lock().unwrap();
        assert!(connections.get("one").unwrap().is_empty());
        assert_eq!(connections.get("two").unwrap().len(), 1);
    }

    #[test]
    fn chat_history_accumulates_and_replays_in_order() {
        let state = AppState::new();
        state.register_connection("game", "a");
        assert!(state.chat_history_for("game").is_empty());

        state.append_chat(
            "game",
            ChatMessage {
                player: "X".to_string(),
                text: "first".to_string(),
            },
        );
        state.append_chat(
            "game",
            ChatMessage {
                player: "O".to_string(),
                text: "second".to_string(),
            },
        );

        let history = state.chat_history_for("game");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "first");
        assert_eq!(history[1].text, "second");
    }

    #[test]
    fn chat_history_for_an_unknown_game_is_empty() {
        let state = AppState::new();
        assert!(state.chat_history_for("nope").is_empty());
    }
}
