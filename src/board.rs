//! Othello board representation.
//!
//! A [`Board`] is a plain value: an 8x8 grid of `Option<Piece>` stored in a
//! flat array. Copying a board is cheap, and every hypothetical future in
//! the search tree holds its own copy. Moves never mutate a snapshot in
//! place; [`Board::apply`] and [`Board::play`] return the successor.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{CELLS, N};
use crate::moves::{CaptureSet, LegalMoves, legal_moves};

/// One of the two sides. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Piece {
    Black,
    White,
}

impl Piece {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Piece {
        match self {
            Piece::Black => Piece::White,
            Piece::White => Piece::Black,
        }
    }

    /// Board symbol: `X` for Black, `O` for White.
    pub fn symbol(self) -> char {
        match self {
            Piece::Black => 'X',
            Piece::White => 'O',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell on the board, 0-indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    /// Create a coordinate, or `None` if it lies off the board.
    pub fn new(row: usize, col: usize) -> Option<Coord> {
        (row < N && col < N).then_some(Coord { row, col })
    }

    /// The neighbouring cell in direction `(dr, dc)`, or `None` past the edge.
    #[inline]
    pub fn step(self, (dr, dc): (isize, isize)) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Coord::new(row, col)
    }

    #[inline]
    fn index(self) -> usize {
        self.row * N + self.col
    }

    /// Iterate over every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..CELLS).map(|i| Coord { row: i / N, col: i % N })
    }
}

/// Displays as 1-based "row col", the same form [`FromStr`] accepts.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row + 1, self.col + 1)
    }
}

impl FromStr for Coord {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BoardError::BadCoord(s.to_string());
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [row, col] = parts.as_slice() else {
            return Err(bad());
        };
        let row: usize = row.parse().map_err(|_| bad())?;
        let col: usize = col.parse().map_err(|_| bad())?;
        if row == 0 || col == 0 {
            return Err(bad());
        }
        Coord::new(row - 1, col - 1).ok_or_else(bad)
    }
}

/// Errors raised for malformed boards, coordinates, or moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("invalid symbol {symbol:?} at row {row}, column {col}")]
    Symbol { row: usize, col: usize, symbol: char },

    #[error("invalid coordinate {0:?}, expected \"row col\" in 1..=8")]
    BadCoord(String),

    #[error("{piece} cannot move to {coord}")]
    IllegalMove { piece: Piece, coord: Coord },
}

/// An 8x8 Othello board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.set(Coord { row: 3, col: 3 }, Some(Piece::Black));
        board.set(Coord { row: 4, col: 4 }, Some(Piece::Black));
        board.set(Coord { row: 3, col: 4 }, Some(Piece::White));
        board.set(Coord { row: 4, col: 3 }, Some(Piece::White));
        board
    }

    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self { cells: [None; CELLS] }
    }

    /// Parse a board from 8 rows of `X`, `O` and `.` characters.
    ///
    /// Whitespace inside a row is ignored, so both `"..XO...."` and
    /// `". . X O . . . ."` are accepted.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        if rows.len() != N {
            return Err(BoardError::RowCount(rows.len()));
        }
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != N {
                return Err(BoardError::RowLength {
                    row,
                    len: symbols.len(),
                });
            }
            for (col, &symbol) in symbols.iter().enumerate() {
                let cell = match symbol {
                    'X' | 'x' => Some(Piece::Black),
                    'O' | 'o' => Some(Piece::White),
                    '.' => None,
                    _ => return Err(BoardError::Symbol { row, col, symbol }),
                };
                board.set(Coord { row, col }, cell);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.index()]
    }

    #[inline]
    pub fn set(&mut self, c: Coord, cell: Option<Piece>) {
        self.cells[c.index()] = cell;
    }

    /// Number of cells holding `piece`.
    pub fn count(&self, piece: Piece) -> usize {
        self.cells.iter().filter(|&&c| c == Some(piece)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The side with strictly more pieces, or `None` on a tie.
    pub fn winner(&self) -> Option<Piece> {
        let black = self.count(Piece::Black);
        let white = self.count(Piece::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Piece::Black),
            std::cmp::Ordering::Less => Some(Piece::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Return the board after `piece` plays at `dest`, flipping every
    /// cell in `captures`.
    ///
    /// No legality check is done here; callers pass a capture set taken
    /// from [`legal_moves`].
    pub fn apply(&self, piece: Piece, dest: Coord, captures: &CaptureSet) -> Board {
        let mut next = *self;
        next.set(dest, Some(piece));
        for c in captures.flipped() {
            next.set(c, Some(piece));
        }
        next
    }

    /// Validate and play a move, returning the resulting board.
    pub fn play(&self, piece: Piece, dest: Coord) -> Result<Board, BoardError> {
        let moves = legal_moves(self, piece);
        let captures = moves
            .get(&dest)
            .ok_or(BoardError::IllegalMove { piece, coord: dest })?;
        Ok(self.apply(piece, dest, captures))
    }

    /// Render the board, marking the keys of `hints` with `?`.
    pub fn render_with_hints(&self, hints: &LegalMoves) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.render(&mut out, Some(hints));
        out
    }

    fn render(&self, out: &mut impl fmt::Write, hints: Option<&LegalMoves>) -> fmt::Result {
        let labels: String = (1..=N).map(|i| format!(" {i}")).collect();
        writeln!(out, "  {labels}")?;
        for row in 0..N {
            write!(out, "{:>2}", row + 1)?;
            for col in 0..N {
                let c = Coord { row, col };
                let ch = match self.get(c) {
                    Some(p) => p.symbol(),
                    None if hints.is_some_and(|h| h.contains_key(&c)) => '?',
                    None => '.',
                };
                write!(out, " {ch}")?;
            }
            writeln!(out, " {}", row + 1)?;
        }
        writeln!(out, "  {labels}")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let board = Board::new();
        assert_eq!(board.count(Piece::Black), 2);
        assert_eq!(board.count(Piece::White), 2);
        assert_eq!(board.get(Coord { row: 3, col: 3 }), Some(Piece::Black));
        assert_eq!(board.get(Coord { row: 4, col: 4 }), Some(Piece::Black));
        assert_eq!(board.get(Coord { row: 3, col: 4 }), Some(Piece::White));
        assert_eq!(board.get(Coord { row: 4, col: 3 }), Some(Piece::White));
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_winner_by_majority() {
        let mut board = Board::new();
        board.set(Coord { row: 0, col: 0 }, Some(Piece::White));
        assert_eq!(board.winner(), Some(Piece::White));
        board.set(Coord { row: 0, col: 1 }, Some(Piece::Black));
        board.set(Coord { row: 0, col: 2 }, Some(Piece::Black));
        assert_eq!(board.winner(), Some(Piece::Black));
    }

    #[test]
    fn test_full_board_tie() {
        let mut board = Board::empty();
        for c in Coord::all() {
            let piece = if c.row < 4 { Piece::Black } else { Piece::White };
            board.set(c, Some(piece));
        }
        assert!(board.is_full());
        assert_eq!(board.count(Piece::Black), 32);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_coord_step_stops_at_edges() {
        let corner = Coord { row: 0, col: 0 };
        assert_eq!(corner.step((-1, 0)), None);
        assert_eq!(corner.step((0, -1)), None);
        assert_eq!(corner.step((1, 1)), Some(Coord { row: 1, col: 1 }));

        let far = Coord { row: 7, col: 7 };
        assert_eq!(far.step((1, 0)), None);
        assert_eq!(far.step((0, 1)), None);
        assert_eq!(far.step((-1, -1)), Some(Coord { row: 6, col: 6 }));
    }

    #[test]
    fn test_coord_parse() {
        assert_eq!("3 4".parse::<Coord>(), Ok(Coord { row: 2, col: 3 }));
        assert_eq!("  8   8 ".parse::<Coord>(), Ok(Coord { row: 7, col: 7 }));
        assert!("0 1".parse::<Coord>().is_err());
        assert!("9 1".parse::<Coord>().is_err());
        assert!("a b".parse::<Coord>().is_err());
        assert!("3".parse::<Coord>().is_err());
        assert!("1 2 3".parse::<Coord>().is_err());
    }

    #[test]
    fn test_coord_display_roundtrip() {
        for c in Coord::all() {
            assert_eq!(c.to_string().parse::<Coord>(), Ok(c));
        }
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&[
            "........", "........", "........", "...XO...", "...OX...", "........",
            "........", "........",
        ])
        .unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(Board::from_rows(&["........"]), Err(BoardError::RowCount(1)));

        let mut rows = vec!["........"; 8];
        rows[2] = "....";
        assert_eq!(
            Board::from_rows(&rows),
            Err(BoardError::RowLength { row: 2, len: 4 })
        );

        rows[2] = "...Z....";
        assert_eq!(
            Board::from_rows(&rows),
            Err(BoardError::Symbol {
                row: 2,
                col: 3,
                symbol: 'Z'
            })
        );
    }

    #[test]
    fn test_play_rejects_illegal_move() {
        let board = Board::new();
        let err = board.play(Piece::Black, Coord { row: 0, col: 0 }).unwrap_err();
        assert!(matches!(err, BoardError::IllegalMove { .. }));
    }

    #[test]
    fn test_play_flips() {
        let board = Board::new().play(Piece::Black, Coord { row: 2, col: 4 }).unwrap();
        assert_eq!(board.get(Coord { row: 2, col: 4 }), Some(Piece::Black));
        assert_eq!(board.get(Coord { row: 3, col: 4 }), Some(Piece::Black));
        assert_eq!(board.count(Piece::Black), 4);
        assert_eq!(board.count(Piece::White), 1);

        let board = Board::new().play(Piece::White, Coord { row: 2, col: 3 }).unwrap();
        assert_eq!(board.get(Coord { row: 3, col: 3 }), Some(Piece::White));
        assert_eq!(board.count(Piece::White), 4);
        assert_eq!(board.count(Piece::Black), 1);
    }

    #[test]
    fn test_render_marks_hints() {
        let board = Board::new();
        let text = board.render_with_hints(&legal_moves(&board, Piece::Black));
        assert_eq!(text.matches('?').count(), 4);
        assert_eq!(board.to_string().matches('?').count(), 0);
        assert_eq!(text.lines().count(), N + 2);
    }
}
