pub mod game_handlers;
pub mod handler;

pub use handler::{ws_index, GameWebSocket};
