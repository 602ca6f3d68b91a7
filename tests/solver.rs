//! Game-tree properties of tic-tac-toe.

use std::thread;

use pdpscope::solver::{
    count_games, count_reachable_positions, count_symmetric_positions, Board, Cell, Outcome,
    SearchStats, Solver, SYMMETRIES,
};

#[test]
fn census() {
    assert_eq!(count_reachable_positions(), 5478);
    assert_eq!(count_symmetric_positions(), 765);
    assert_eq!(count_games(), 255_168);
}

#[test]
fn perfect_play_draws() {
    let solver = Solver::new();
    let mut stats = SearchStats::default();

    assert_eq!(solver.evaluate(&Board::new(), &mut stats), Outcome::Draw);
    assert_eq!(stats.positions_evaluated, 765);

    // Finished positions up to symmetry, by result.
    assert_eq!(stats.x_wins, 91);
    assert_eq!(stats.o_wins, 44);
    assert_eq!(stats.draws, 3);
}

#[test]
fn self_play_ends_in_a_draw() {
    let solver = Solver::new();
    let mut stats = SearchStats::default();
    let mut board = Board::new();

    while let Some(best) = solver.best_move(&board, &mut stats) {
        assert_eq!(best.outcome, Outcome::Draw);
        board = board.play(best.cell).unwrap();
    }

    assert!(board.is_full());
    assert_eq!(board.winner(), None);
    assert_eq!(board.count(Cell::X), 5);
}

#[test]
fn symmetric_positions_share_a_value() {
    let solver = Solver::new();
    let mut stats = SearchStats::default();
    let board: Board = "X../.O./...".parse().unwrap();
    let value = solver.evaluate(&board, &mut stats);

    let before = solver.cache_len();
    for symmetry in &SYMMETRIES {
        assert_eq!(solver.evaluate(&board.transform(symmetry), &mut stats), value);
    }
    assert_eq!(solver.cache_len(), before);
}

#[test]
fn concurrent_evaluation_is_shared() {
    let solver = Solver::new();

    let totals: Vec<SearchStats> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut stats = SearchStats::default();
                    assert_eq!(solver.evaluate(&Board::new(), &mut stats), Outcome::Draw);
                    stats
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut merged = SearchStats::default();
    for stats in &totals {
        merged.merge(stats);
    }

    // Every canonical position is evaluated by exactly one thread.
    assert_eq!(merged.positions_evaluated, 765);
    assert_eq!(solver.cache_len(), 765);
}

#[test]
fn punishes_a_mistake() {
    let solver = Solver::new();
    let mut stats = SearchStats::default();

    // X centre, O edge: X can force a win.
    let board: Board = ".O./.X./...".parse().unwrap();
    assert_eq!(solver.evaluate(&board, &mut stats), Outcome::XWins);

    let best = solver.best_move(&board, &mut stats).unwrap();
    assert_eq!(best.outcome, Outcome::XWins);
}
