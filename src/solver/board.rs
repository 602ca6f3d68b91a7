//! Tic-tac-toe positions.
//!
//! Cells are numbered row by row:
//!
//! ```text
//!  0 | 1 | 2
//! -----------
//!  3 | 4 | 5
//! -----------
//!  6 | 7 | 8
//! ```
//!
//! X always moves first, so the side to move follows from the piece counts and is not
//! stored.

use std::{fmt, str::FromStr};

use strum::Display;

use crate::{Error, Result};

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// The eight winning lines: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The dihedral group of the square as cell permutations.
///
/// Image cell `i` of a transformed board takes the value of source cell `SYMMETRIES[s][i]`.
#[rustfmt::skip]
pub const SYMMETRIES: [[usize; CELLS]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8], // identity
    [6, 3, 0, 7, 4, 1, 8, 5, 2], // rotate 90
    [8, 7, 6, 5, 4, 3, 2, 1, 0], // rotate 180
    [2, 5, 8, 1, 4, 7, 0, 3, 6], // rotate 270
    [2, 1, 0, 5, 4, 3, 8, 7, 6], // mirror
    [8, 5, 2, 7, 4, 1, 6, 3, 0], // anti-diagonal
    [6, 7, 8, 3, 4, 5, 0, 1, 2], // flip
    [0, 3, 6, 1, 4, 7, 2, 5, 8], // transpose
];

/// Packed base-3 encoding of a board, cell 0 most significant.
pub type BoardKey = u32;

/// Contents of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Cell {
    /// Nobody has played here
    #[default]
    #[strum(serialize = ".")]
    Empty,
    /// Taken by the first player
    #[strum(serialize = "X")]
    X,
    /// Taken by the second player
    #[strum(serialize = "O")]
    O,
}

impl Cell {
    /// The other player; `Empty` stays `Empty`.
    #[must_use]
    pub fn opponent(self) -> Cell {
        match self {
            Cell::X => Cell::O,
            Cell::O => Cell::X,
            Cell::Empty => Cell::Empty,
        }
    }

    fn digit(self) -> BoardKey {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }
}

/// A tic-tac-toe position.
///
/// # Examples
///
/// ```rust
/// use pdpscope::solver::{Board, Cell};
///
/// let board = Board::new().play(4)?.play(0)?;
/// assert_eq!(board.cell(4), Some(Cell::X));
/// assert_eq!(board.to_move(), Cell::X);
/// assert_eq!(board.moves().count(), 7);
/// # Ok::<(), pdpscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// The empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All nine cells.
    #[must_use]
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// The cell at `index`, `None` past the board.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Number of cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn to_move(&self) -> Cell {
        if self.count(Cell::X) > self.count(Cell::O) {
            Cell::O
        } else {
            Cell::X
        }
    }

    /// The player owning a complete line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Cell> {
        LINES.iter().find_map(|&[a, b, c]| {
            let cell = self.cells[a];
            (cell != Cell::Empty && cell == self.cells[b] && cell == self.cells[c]).then_some(cell)
        })
    }

    /// Returns `true` if no cell is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Returns `true` if the game is over.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Legal moves in cell order; none once the game is over.
    pub fn moves(&self) -> impl Iterator<Item = usize> + '_ {
        let open = !self.is_terminal();
        (0..CELLS).filter(move |&index| open && self.cells[index] == Cell::Empty)
    }

    /// The position after the side to move plays `index`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if `index` is off the board, already taken, or the
    /// game is over.
    pub fn play(&self, index: usize) -> Result<Board> {
        if self.cell(index) != Some(Cell::Empty) || self.is_terminal() {
            return Err(Error::IllegalMove(index));
        }

        let mut next = *self;
        next.cells[index] = self.to_move();
        Ok(next)
    }

    /// The board under one of the [`SYMMETRIES`].
    #[must_use]
    pub fn transform(&self, symmetry: &[usize; CELLS]) -> Board {
        let mut cells = [Cell::Empty; CELLS];
        for (target, &source) in cells.iter_mut().zip(symmetry) {
            *target = self.cells[source];
        }
        Board { cells }
    }

    /// Base-3 encoding of this exact position.
    #[must_use]
    pub fn key(&self) -> BoardKey {
        self.cells
            .iter()
            .fold(0, |key, cell| key * 3 + cell.digit())
    }

    /// Smallest [`Board::key`] among the eight symmetric images of this position.
    ///
    /// Positions that are rotations or reflections of each other share a canonical key.
    #[must_use]
    pub fn canonical(&self) -> BoardKey {
        SYMMETRIES
            .iter()
            .map(|symmetry| self.transform(symmetry).key())
            .min()
            .unwrap_or_else(|| self.key())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            let marks: Vec<String> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => " ".to_string(),
                    other => other.to_string(),
                })
                .collect();
            writeln!(f, " {}", marks.join(" | "))?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses nine cells of `X`, `O` and `.` (or `-`), optionally split into rows by `/`.
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = [Cell::Empty; CELLS];
        let mut count = 0;

        for c in s.chars().filter(|&c| c != '/') {
            let cell = match c {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                '.' | '-' => Cell::Empty,
                other => return Err(malformed_error!("Invalid board character '{}'", other)),
            };
            if count == CELLS {
                return Err(malformed_error!("Board has more than {} cells", CELLS));
            }
            cells[count] = cell;
            count += 1;
        }
        if count != CELLS {
            return Err(malformed_error!("Board has {} cells, expected {}", count, CELLS));
        }

        let board = Board { cells };
        let (x, o) = (board.count(Cell::X), board.count(Cell::O));
        if x != o && x != o + 1 {
            return Err(malformed_error!("Unreachable position - {} X against {} O", x, o));
        }
        Ok(board)
    }
}
