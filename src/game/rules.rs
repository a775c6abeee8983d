use thiserror::Error;

use crate::models::{Board, GameState, Player};

/// The 8 winning triples, scanned in this fixed order. The first matching
/// triple is the one reported, so tie-breaking is deterministic.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // main diagonal
    [0, 4, 8],
    // anti-diagonal
    [2, 4, 6],
    // right column
    [2, 5, 8],
    // left column
    [0, 3, 6],
    // middle column
    [1, 4, 7],
    // top row
    [0, 1, 2],
    // middle row
    [3, 4, 5],
    // bottom row
    [6, 7, 8],
];

/// Why a move was rejected. Surfaced as a 400 over HTTP and as an error
/// message to the originating socket.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Game is already over")]
    GameOver,
    #[error("Position is already occupied")]
    Occupied,
    #[error("Position must be between 0 and 8")]
    OutOfRange,
}

/// A decided game: who won and on which triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinnerData {
    pub winner: Player,
    pub winning_positions: [usize; 3],
}

/// Returns the first winning triple held entirely by `mark`, if any.
///
/// Takes the mover's mark explicitly rather than inferring it from whose
/// turn comes next, so callers apply it to the board right after placing
/// the mark.
pub fn winning_line(board: &Board, mark: Player) -> Option<[usize; 3]> {
    WINNING_LINES
        .iter()
        .copied()
        .find(|line| line.iter().all(|&pos| board[pos] == Some(mark)))
}

/// Scans the board for a completed triple by either mark.
pub fn detect_winner(board: &Board) -> Option<WinnerData> {
    WINNING_LINES.iter().copied().find_map(|line| {
        let [a, b, c] = line;
        match board[a] {
            Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => Some(WinnerData {
                winner: mark,
                winning_positions: line,
            }),
            _ => None,
        }
    })
}

/// True when every cell is occupied and nobody has won.
pub fn detect_draw(board: &Board) -> bool {
    board.iter().all(|cell| cell.is_some()) && detect_winner(board).is_none()
}

/// Places the current player's mark at `position` and returns the next
/// state: mark set, turn switched, and the winning triple attached if the
/// move completed one. The input state is never mutated; a failed attempt
/// leaves the caller's state exactly as it was.
pub fn apply_move(state: &GameState, position: i64) -> Result<GameState, MoveError> {
    if state.winning_positions.is_some() || detect_winner(&state.board).is_some() {
        return Err(MoveError::GameOver);
    }

    let position = usize::try_from(position).map_err(|_| MoveError::OutOfRange)?;
    if position > 8 {
        return Err(MoveError::OutOfRange);
    }

    if state.board[position].is_some() {
        return Err(MoveError::Occupied);
    }

    let mover = state.current_player;
    let mut board = state.board;
    board[position] = Some(mover);

    Ok(GameState {
        board,
        current_player: mover.opponent(),
        in_active: state.in_active,
        game_id: state.game_id.clone(),
        winning_positions: winning_line(&board, mover),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Option<Player> = Some(Player::X);
    const O: Option<Player> = Some(Player::O);
    const E: Option<Player> = None;

    /// Applies a sequence of moves to a fresh game, panicking on any
    /// rejected move.
    fn play_moves(positions: &[i64]) -> GameState {
        positions.iter().fold(GameState::new(), |state, &pos| {
            apply_move(&state, pos).expect("valid move rejected")
        })
    }

    #[test]
    fn places_the_current_players_mark() {
        let state = apply_move(&GameState::new(), 0).unwrap();
        assert_eq!(state.board[0], X);
    }

    #[test]
    fn switches_the_current_player_after_a_move() {
        let state = apply_move(&GameState::new(), 0).unwrap();
        assert_eq!(state.current_player, Player::O);
    }

    #[test]
    fn alternates_players_across_moves() {
        let state = play_moves(&[0, 1, 2]);
        assert_eq!(state.board[0], X);
        assert_eq!(state.board[1], O);
        assert_eq!(state.board[2], X);
        assert_eq!(state.current_player, Player::O);
    }

    #[test]
    fn does_not_mutate_the_input_state() {
        let original = GameState::new();
        let next = apply_move(&original, 4).unwrap();
        assert_eq!(original.board[4], E);
        assert_eq!(next.board[4], X);
    }

    #[test]
    fn rejects_an_occupied_position() {
        let state = play_moves(&[4]);
        assert_eq!(apply_move(&state, 4), Err(MoveError::Occupied));
        // The rejected attempt leaves the state untouched.
        assert_eq!(state.board[4], X);
        assert_eq!(state.current_player, Player::O);
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let state = GameState::new();
        assert_eq!(apply_move(&state, 9), Err(MoveError::OutOfRange));
        assert_eq!(apply_move(&state, -1), Err(MoveError::OutOfRange));
        assert_eq!(apply_move(&state, i64::MAX), Err(MoveError::OutOfRange));
    }

    #[test]
    fn rejects_moves_after_the_game_is_won() {
        // X takes the top row: 0, 1, 2 with O filling in between.
        let state = play_moves(&[0, 3, 1, 4, 2]);
        assert!(state.winning_positions.is_some());
        assert_eq!(apply_move(&state, 8), Err(MoveError::GameOver));
    }

    #[test]
    fn rejects_moves_on_a_won_board_even_without_recorded_positions() {
        let state = GameState {
            board: [X, X, X, E, E, E, E, E, E],
            current_player: Player::O,
            ..GameState::new()
        };
        assert_eq!(apply_move(&state, 5), Err(MoveError::GameOver));
    }

    #[test]
    fn no_winner_on_an_empty_board() {
        assert_eq!(detect_winner(&[E; 9]), None);
    }

    #[test]
    fn detects_x_winning_the_top_row() {
        let board = [X, X, X, E, E, E, E, E, E];
        assert_eq!(
            detect_winner(&board),
            Some(WinnerData {
                winner: Player::X,
                winning_positions: [0, 1, 2],
            })
        );
    }

    #[test]
    fn detects_o_winning_a_column() {
        let board = [O, X, X, O, E, E, O, E, X];
        assert_eq!(
            detect_winner(&board),
            Some(WinnerData {
                winner: Player::O,
                winning_positions: [0, 3, 6],
            })
        );
    }

    #[test]
    fn diagonal_is_reported_first_when_several_lines_are_complete() {
        // Top row and main diagonal both belong to X; the scan order puts
        // the diagonal first.
        let board = [X, X, X, E, X, E, E, E, X];
        assert_eq!(
            detect_winner(&board).unwrap().winning_positions,
            [0, 4, 8]
        );
    }

    #[test]
    fn winning_line_checks_the_given_mark_only() {
        let board = [X, X, X, E, E, E, E, E, E];
        assert_eq!(winning_line(&board, Player::X), Some([0, 1, 2]));
        assert_eq!(winning_line(&board, Player::O), None);
    }

    #[test]
    fn full_board_without_a_line_is_a_draw() {
        // X O X / X O O / O X X
        let board = [X, O, X, X, O, O, O, X, X];
        assert!(detect_draw(&board));
        assert_eq!(detect_winner(&board), None);
    }

    #[test]
    fn a_board_with_empty_cells_is_not_a_draw() {
        assert!(!detect_draw(&[E; 9]));
        assert!(!detect_draw(&[X, O, X, E, E, E, E, E, E]));
    }

    #[test]
    fn a_won_board_is_not_a_draw() {
        let board = [X, X, X, O, O, X, X, O, O];
        assert!(!detect_draw(&board));
    }

    #[test]
    fn winning_move_attaches_the_line_and_ends_the_game() {
        // X: center, 1, 7 — the middle column. O: 0, 3.
        let state = play_moves(&[4, 0, 1, 3, 7]);
        assert_eq!(state.winning_positions, Some([1, 4, 7]));
        assert_eq!(
            detect_winner(&state.board).unwrap().winner,
            Player::X
        );
        assert_eq!(state.current_player, Player::O);
    }

    #[test]
    fn mark_counts_stay_balanced_after_any_valid_sequence() {
        for moves in [&[0][..], &[0, 1], &[4, 0, 1, 3], &[4, 0, 1, 3, 7]] {
            let state = play_moves(moves);
            let x_count = state.board.iter().filter(|&&cell| cell == X).count();
            let o_count = state.board.iter().filter(|&&cell| cell == O).count();
            assert!(
                x_count == o_count || x_count == o_count + 1,
                "unbalanced board after {:?}: {} X vs {} O",
                moves,
                x_count,
                o_count
            );
        }
    }
}
