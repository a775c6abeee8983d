use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two marks that can occupy a cell. X always moves first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Cell = Option<Player>;

/// 3x3 grid as a 9-element array, row-major:
///  0 | 1 | 2
///  ---------
///  3 | 4 | 5
///  ---------
///  6 | 7 | 8
pub type Board = [Cell; 9];

/// Game state for a specific game
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    #[serde(default, skip_serializing_if = "is_false")]
    pub in_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_positions: Option<[usize; 3]>,
}

impl GameState {
    /// A truly blank game: empty board, X to move.
    pub fn new() -> Self {
        GameState {
            board: [None; 9],
            current_player: Player::X,
            in_active: false,
            game_id: None,
            winning_positions: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Identity assigned to a connection, derived from its join order for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Player),
    Spectator(usize),
}

impl Role {
    /// First connection plays X, second plays O, everyone after that is a
    /// numbered spectator. Derived from the live count at join time, so a
    /// reconnect after a disconnect gets whatever the current count implies.
    pub fn from_join_order(live_count: usize) -> Self {
        match live_count {
            0 => Role::Player(Player::X),
            1 => Role::Player(Player::O),
            n => Role::Spectator(n - 1),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player(player) => f.write_str(player.as_str()),
            Role::Spectator(n) => write!(f, "Spectator {}", n),
        }
    }
}
