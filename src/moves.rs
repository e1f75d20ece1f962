//! Legal move enumeration.
//!
//! For every piece of the acting side, each of the eight directions is
//! scanned outward. A direction yields a move when it crosses one or more
//! opponent pieces and then reaches an empty cell: the empty cell is the
//! destination and the crossed pieces are the capture chain. Running off
//! the board or meeting one of the acting side's own pieces first kills the
//! direction.
//!
//! Chains for the same destination found from different sources or
//! directions are collected into a single [`CaptureSet`]. The same cell may
//! appear in more than one chain; flipping it twice is harmless.

use std::collections::BTreeMap;

use crate::board::{Board, Coord, Piece};
use crate::constants::DIRECTIONS;

/// The opponent pieces a single move would flip, grouped by chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureSet {
    chains: Vec<Vec<Coord>>,
}

impl CaptureSet {
    /// The individual capture chains, each ordered outward from the source.
    pub fn chains(&self) -> &[Vec<Coord>] {
        &self.chains
    }

    /// Every flipped coordinate across all chains (duplicates possible).
    pub fn flipped(&self) -> impl Iterator<Item = Coord> + '_ {
        self.chains.iter().flatten().copied()
    }

    /// Total number of flipped coordinates, counting duplicates.
    pub fn len(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, chain: Vec<Coord>) {
        self.chains.push(chain);
    }
}

/// Destination -> capture set. Ordered so that search over it is
/// reproducible for a fixed random seed.
pub type LegalMoves = BTreeMap<Coord, CaptureSet>;

/// Compute every legal move for `piece` on `board`.
pub fn legal_moves(board: &Board, piece: Piece) -> LegalMoves {
    let mut moves = LegalMoves::new();
    for src in Coord::all() {
        if board.get(src) != Some(piece) {
            continue;
        }
        for dir in DIRECTIONS {
            if let Some((dest, chain)) = scan(board, piece, src, dir) {
                moves.entry(dest).or_default().push(chain);
            }
        }
    }
    moves
}

/// Whether `piece` has at least one legal move.
pub fn has_moves(board: &Board, piece: Piece) -> bool {
    Coord::all()
        .filter(|&src| board.get(src) == Some(piece))
        .any(|src| DIRECTIONS.iter().any(|&dir| scan(board, piece, src, dir).is_some()))
}

/// Walk from `src` in direction `dir`, returning the destination and the
/// opponent chain crossed to reach it.
fn scan(board: &Board, piece: Piece, src: Coord, dir: (isize, isize)) -> Option<(Coord, Vec<Coord>)> {
    let opponent = piece.opponent();
    let mut chain = Vec::new();
    let mut cur = src.step(dir)?;

    loop {
        match board.get(cur) {
            Some(p) if p == opponent => chain.push(cur),
            Some(_) => return None,
            None if chain.is_empty() => return None,
            None => return Some((cur, chain)),
        }
        cur = cur.step(dir)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    #[test]
    fn test_opening_moves_black() {
        let moves = legal_moves(&Board::new(), Piece::Black);
        let got: Vec<(Coord, Vec<Vec<Coord>>)> = moves
            .iter()
            .map(|(&dest, caps)| (dest, caps.chains().to_vec()))
            .collect();
        assert_eq!(
            got,
            vec![
                (c(2, 4), vec![vec![c(3, 4)]]),
                (c(3, 5), vec![vec![c(3, 4)]]),
                (c(4, 2), vec![vec![c(4, 3)]]),
                (c(5, 3), vec![vec![c(4, 3)]]),
            ]
        );
    }

    #[test]
    fn test_opening_moves_white() {
        let moves = legal_moves(&Board::new(), Piece::White);
        let got: Vec<(Coord, Vec<Coord>)> = moves
            .iter()
            .map(|(&dest, caps)| (dest, caps.flipped().collect()))
            .collect();
        assert_eq!(
            got,
            vec![
                (c(2, 3), vec![c(3, 3)]),
                (c(3, 2), vec![c(3, 3)]),
                (c(4, 5), vec![c(4, 4)]),
                (c(5, 4), vec![c(4, 4)]),
            ]
        );
    }

    #[test]
    fn test_no_pieces_no_moves() {
        let mut board = Board::empty();
        board.set(c(3, 3), Some(Piece::White));
        assert!(legal_moves(&board, Piece::Black).is_empty());
        assert!(!has_moves(&board, Piece::Black));
    }

    #[test]
    fn test_full_board_no_moves() {
        let mut board = Board::empty();
        for cell in Coord::all() {
            let piece = if (cell.row + cell.col) % 2 == 0 {
                Piece::Black
            } else {
                Piece::White
            };
            board.set(cell, Some(piece));
        }
        assert!(legal_moves(&board, Piece::Black).is_empty());
        assert!(legal_moves(&board, Piece::White).is_empty());
    }

    #[test]
    fn test_chain_running_off_edge_is_discarded() {
        // X O O O O O O O on the top row: no empty terminus to the east.
        let board = Board::from_rows(&[
            "XOOOOOOO", "........", "........", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        let moves = legal_moves(&board, Piece::Black);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_own_piece_blocks_direction() {
        let board = Board::from_rows(&[
            "XOX.....", "........", "........", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        // Both black pieces bracket the white one; nothing empty in between.
        assert!(legal_moves(&board, Piece::Black).is_empty());
    }

    #[test]
    fn test_long_chain_and_merged_destinations() {
        // Two black sources nominate the same empty destination at (0,4):
        // along the row from (0,0) and down the column from (4,4).
        let board = Board::from_rows(&[
            "XOOO....", "....O...", "....O...", "....O...", "....X...", "........",
            "........", "........",
        ])
        .unwrap();
        let moves = legal_moves(&board, Piece::Black);
        let caps = moves.get(&c(0, 4)).expect("merged destination");
        assert_eq!(caps.chains().len(), 2);
        assert_eq!(caps.len(), 6);
        assert!(caps.chains().contains(&vec![c(0, 1), c(0, 2), c(0, 3)]));
        assert!(caps.chains().contains(&vec![c(3, 4), c(2, 4), c(1, 4)]));
    }

    #[test]
    fn test_diagonal_capture() {
        let board = Board::from_rows(&[
            "X.......", ".O......", "..O.....", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        let moves = legal_moves(&board, Piece::Black);
        assert_eq!(moves.len(), 1);
        let caps = &moves[&c(3, 3)];
        assert_eq!(caps.chains(), &[vec![c(1, 1), c(2, 2)]]);
    }

    #[test]
    fn test_has_moves_agrees_with_legal_moves() {
        let board = Board::new();
        assert!(has_moves(&board, Piece::Black));
        assert!(has_moves(&board, Piece::White));
    }
}
