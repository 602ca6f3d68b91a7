//! Tic-tac-toe game-tree solver.
//!
//! The historical `ttt` binary learned its moves from a knowledge file. This module solves
//! the game outright instead: a memoized minimax over positions reduced by the eight
//! symmetries of the board, plus a census of the game tree.
//!
//! # Key Types
//! - [`Board`] - A position; X always moves first
//! - [`Solver`] - Minimax with a shared, concurrent cache
//! - [`Outcome`] - Value of a position under perfect play
//! - [`SearchStats`] - Counters a search accumulates
//!
//! # Example
//!
//! ```rust
//! use pdpscope::solver::{Board, SearchStats, Solver};
//!
//! let solver = Solver::new();
//! let mut stats = SearchStats::default();
//!
//! let board = Board::new().play(4)?;
//! if let Some(reply) = solver.best_move(&board, &mut stats) {
//!     println!("O plays {} ({})", reply.cell, reply.outcome);
//! }
//! println!("{} positions evaluated", stats.positions_evaluated);
//! # Ok::<(), pdpscope::Error>(())
//! ```

mod board;
mod minimax;
mod positions;

pub use board::{Board, BoardKey, Cell, CELLS, LINES, SYMMETRIES};
pub use minimax::{Move, Outcome, SearchStats, Solver};
pub use positions::{count_games, count_reachable_positions, count_symmetric_positions};
