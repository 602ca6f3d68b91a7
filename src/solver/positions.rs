//! Game-tree census: how many positions and games tic-tac-toe has.

use std::collections::HashSet;

use crate::solver::board::{Board, BoardKey};

/// Number of distinct positions reachable from the empty board, the empty board included.
///
/// Play stops at a win or a full board, so positions after a finished game are excluded.
///
/// ```rust
/// assert_eq!(pdpscope::solver::count_reachable_positions(), 5478);
/// ```
#[must_use]
pub fn count_reachable_positions() -> usize {
    let mut seen = HashSet::new();
    explore(&Board::new(), &mut seen, Board::key);
    seen.len()
}

/// Number of reachable positions once rotations and reflections are identified.
///
/// ```rust
/// assert_eq!(pdpscope::solver::count_symmetric_positions(), 765);
/// ```
#[must_use]
pub fn count_symmetric_positions() -> usize {
    let mut seen = HashSet::new();
    explore(&Board::new(), &mut seen, Board::canonical);
    seen.len()
}

/// Number of distinct move sequences from the empty board to a finished game.
///
/// ```rust
/// assert_eq!(pdpscope::solver::count_games(), 255_168);
/// ```
#[must_use]
pub fn count_games() -> u64 {
    fn games(board: &Board) -> u64 {
        if board.is_terminal() {
            return 1;
        }
        board
            .moves()
            .filter_map(|cell| board.play(cell).ok())
            .map(|child| games(&child))
            .sum()
    }

    games(&Board::new())
}

fn explore(board: &Board, seen: &mut HashSet<BoardKey>, key: fn(&Board) -> BoardKey) {
    if !seen.insert(key(board)) {
        return;
    }
    for cell in board.moves() {
        if let Ok(child) = board.play(cell) {
            explore(&child, seen, key);
        }
    }
}
