pub mod game_state;
pub mod messages;

// Re-export important types
pub use game_state::*;
pub use messages::*;
