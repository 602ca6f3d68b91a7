//! Memoized minimax over canonical positions.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rayon::prelude::*;
use strum::Display;

use crate::solver::board::{Board, BoardKey, Cell};

/// Game-theoretic value of a position under perfect play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Outcome {
    /// X forces a win
    #[strum(serialize = "X wins")]
    XWins,
    /// Neither side can force a win
    #[strum(serialize = "draw")]
    Draw,
    /// O forces a win
    #[strum(serialize = "O wins")]
    OWins,
}

impl Outcome {
    /// Score from X's point of view: `+1`, `0` or `-1`.
    #[must_use]
    pub fn score(self) -> i8 {
        match self {
            Outcome::XWins => 1,
            Outcome::Draw => 0,
            Outcome::OWins => -1,
        }
    }

    /// The outcome of a finished game, `None` while moves remain.
    #[must_use]
    pub fn of_terminal(board: &Board) -> Option<Outcome> {
        match board.winner() {
            Some(Cell::X) => Some(Outcome::XWins),
            Some(Cell::O) => Some(Outcome::OWins),
            _ if board.is_full() => Some(Outcome::Draw),
            _ => None,
        }
    }

    fn prefers(self, other: Outcome, player: Cell) -> bool {
        match player {
            Cell::O => self.score() < other.score(),
            _ => self.score() > other.score(),
        }
    }
}

/// Counters collected while searching.
///
/// Each search task owns one; parallel tasks are combined with [`SearchStats::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Canonical positions evaluated (cache misses)
    pub positions_evaluated: u64,
    /// Lookups answered by the cache
    pub cache_hits: u64,
    /// Evaluated positions won by X
    pub x_wins: u64,
    /// Evaluated positions won by O
    pub o_wins: u64,
    /// Evaluated positions ending in a full board without a winner
    pub draws: u64,
}

impl SearchStats {
    /// Adds the counters of `other` to `self`.
    pub fn merge(&mut self, other: &SearchStats) {
        self.positions_evaluated += other.positions_evaluated;
        self.cache_hits += other.cache_hits;
        self.x_wins += other.x_wins;
        self.o_wins += other.o_wins;
        self.draws += other.draws;
    }

    fn record_terminal(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::XWins => self.x_wins += 1,
            Outcome::OWins => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

/// A recommended move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Cell to play
    pub cell: usize,
    /// Value of the position after playing it
    pub outcome: Outcome,
}

/// Minimax solver with a concurrent memo cache.
///
/// The cache maps each canonical position to a [`OnceLock`], so a position is evaluated at
/// most once even when several threads reach it at the same time; latecomers block on the
/// lock and read the stored value. The game tree is acyclic, so waiting never cycles.
///
/// # Examples
///
/// ```rust
/// use pdpscope::solver::{Board, Outcome, SearchStats, Solver};
///
/// let solver = Solver::new();
/// let mut stats = SearchStats::default();
///
/// assert_eq!(solver.evaluate(&Board::new(), &mut stats), Outcome::Draw);
/// assert_eq!(solver.cache_len(), 765);
/// ```
#[derive(Debug, Default)]
pub struct Solver {
    cache: DashMap<BoardKey, Arc<OnceLock<Outcome>>>,
}

impl Solver {
    /// Creates a solver with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of canonical positions with a cache slot.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached value.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// The value of `board` under perfect play from both sides.
    pub fn evaluate(&self, board: &Board, stats: &mut SearchStats) -> Outcome {
        // The map guard is released before evaluation, only the slot is held.
        let slot = Arc::clone(&self.cache.entry(board.canonical()).or_default());

        let mut evaluated = false;
        let outcome = *slot.get_or_init(|| {
            evaluated = true;
            self.search(board, stats)
        });
        if !evaluated {
            stats.cache_hits += 1;
        }
        outcome
    }

    fn search(&self, board: &Board, stats: &mut SearchStats) -> Outcome {
        stats.positions_evaluated += 1;

        if let Some(outcome) = Outcome::of_terminal(board) {
            stats.record_terminal(outcome);
            return outcome;
        }

        let player = board.to_move();
        let mut best: Option<Outcome> = None;
        for cell in board.moves() {
            let Ok(child) = board.play(cell) else {
                continue;
            };
            let outcome = self.evaluate(&child, stats);
            if best.map_or(true, |current| outcome.prefers(current, player)) {
                best = Some(outcome);
            }
        }

        best.unwrap_or(Outcome::Draw)
    }

    /// The best move for the side to move, `None` if the game is over.
    ///
    /// Candidate moves are searched in parallel; among equally good moves the lowest cell
    /// wins. Counters of every task are merged into `stats`.
    pub fn best_move(&self, board: &Board, stats: &mut SearchStats) -> Option<Move> {
        let player = board.to_move();
        let moves: Vec<usize> = board.moves().collect();

        let candidates: Vec<(Move, SearchStats)> = moves
            .into_par_iter()
            .filter_map(|cell| {
                let child = board.play(cell).ok()?;
                let mut local = SearchStats::default();
                let outcome = self.evaluate(&child, &mut local);
                Some((Move { cell, outcome }, local))
            })
            .collect();

        let mut best: Option<Move> = None;
        for (candidate, local) in candidates {
            stats.merge(&local);
            if best.map_or(true, |current| candidate.outcome.prefers(current.outcome, player)) {
                best = Some(candidate);
            }
        }

        log::debug!(
            "best move for {} is {:?}, {} cached positions",
            player,
            best.map(|m| m.cell),
            self.cache.len()
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_draw() {
        let solver = Solver::new();
        let mut stats = SearchStats::default();

        assert_eq!(solver.evaluate(&Board::new(), &mut stats), Outcome::Draw);
        assert_eq!(stats.positions_evaluated, 765);
        assert_eq!(solver.cache_len(), 765);
    }

    #[test]
    fn each_key_evaluated_once() {
        let solver = Solver::new();
        let mut first = SearchStats::default();
        solver.evaluate(&Board::new(), &mut first);

        let mut second = SearchStats::default();
        assert_eq!(solver.evaluate(&Board::new(), &mut second), Outcome::Draw);
        assert_eq!(second.positions_evaluated, 0);
        assert_eq!(second.cache_hits, 1);

        // Every symmetric image of an opening hits the same slot.
        let mut third = SearchStats::default();
        for cell in [0, 2, 6, 8] {
            solver.evaluate(&Board::new().play(cell).unwrap(), &mut third);
        }
        assert_eq!(third.positions_evaluated, 0);
        assert_eq!(third.cache_hits, 4);
    }

    #[test]
    fn finished_positions() {
        let solver = Solver::new();
        let mut stats = SearchStats::default();

        let won: Board = "XXX/OO./...".parse().unwrap();
        assert_eq!(solver.evaluate(&won, &mut stats), Outcome::XWins);
        assert_eq!(stats.x_wins, 1);
        assert!(solver.best_move(&won, &mut stats).is_none());
    }

    #[test]
    fn takes_the_win() {
        let solver = Solver::new();
        let mut stats = SearchStats::default();

        let board: Board = "XX./OO./...".parse().unwrap();
        let best = solver.best_move(&board, &mut stats).unwrap();
        assert_eq!(best, Move { cell: 2, outcome: Outcome::XWins });
    }

    #[test]
    fn blocks_the_threat() {
        let solver = Solver::new();
        let mut stats = SearchStats::default();

        // O to move, X threatens 0-1-2.
        let board: Board = "XX./.O./...".parse().unwrap();
        let best = solver.best_move(&board, &mut stats).unwrap();
        assert_eq!(best.cell, 2);
        assert_eq!(best.outcome, Outcome::Draw);
    }

    #[test]
    fn opening_move_draws() {
        let solver = Solver::new();
        let mut stats = SearchStats::default();

        let best = solver.best_move(&Board::new(), &mut stats).unwrap();
        assert_eq!(best, Move { cell: 0, outcome: Outcome::Draw });
        // The empty board itself is never evaluated.
        assert_eq!(solver.cache_len(), 764);
        assert_eq!(stats.positions_evaluated, 764);
    }

    #[test]
    fn stats_merge() {
        let mut total = SearchStats {
            positions_evaluated: 1,
            ..SearchStats::default()
        };
        total.merge(&SearchStats {
            positions_evaluated: 2,
            cache_hits: 3,
            x_wins: 4,
            o_wins: 5,
            draws: 6,
        });
        assert_eq!(total.positions_evaluated, 3);
        assert_eq!(total.draws, 6);
    }
}
