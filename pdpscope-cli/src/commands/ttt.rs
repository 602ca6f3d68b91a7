use anyhow::Context;
use pdpscope::solver::{
    count_games, count_reachable_positions, count_symmetric_positions, Board, SearchStats, Solver,
};
use serde::Serialize;

use crate::{app::GlobalOptions, output::print_output};

#[derive(Debug, Serialize)]
struct MoveOutput {
    cell: usize,
    outcome: String,
}

#[derive(Debug, Serialize)]
struct SolverOutput {
    games: u64,
    reachable_positions: usize,
    symmetric_positions: usize,
    board: String,
    to_move: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_move: Option<MoveOutput>,
    positions_evaluated: u64,
    cache_hits: u64,
    cached_positions: usize,
}

pub fn run(board: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let board: Board = match board {
        Some(cells) => cells
            .parse()
            .with_context(|| format!("invalid board '{cells}'"))?,
        None => Board::new(),
    };

    let solver = Solver::new();
    let mut stats = SearchStats::default();
    let value = solver.evaluate(&board, &mut stats);
    let best = solver.best_move(&board, &mut stats);

    let output = SolverOutput {
        games: count_games(),
        reachable_positions: count_reachable_positions(),
        symmetric_positions: count_symmetric_positions(),
        board: board.to_string(),
        to_move: board.to_move().to_string(),
        value: value.to_string(),
        best_move: best.map(|m| MoveOutput {
            cell: m.cell + 1,
            outcome: m.outcome.to_string(),
        }),
        positions_evaluated: stats.positions_evaluated,
        cache_hits: stats.cache_hits,
        cached_positions: solver.cache_len(),
    };

    print_output(&output, opts, |out| {
        println!("Possible games:        {}", out.games);
        println!("Reachable positions:   {}", out.reachable_positions);
        println!("Up to symmetry:        {}", out.symmetric_positions);
        println!();
        print!("{}", out.board);
        println!();
        println!("To move:               {}", out.to_move);
        println!("Value:                 {}", out.value);
        if let Some(best) = &out.best_move {
            println!("Best move:             {} ({})", best.cell, best.outcome);
        }
        println!("Positions evaluated:   {}", out.positions_evaluated);
        println!("Cache hits:            {}", out.cache_hits);
        println!("Cached positions:      {}", out.cached_positions);
    })
}
