//! Game loop and players.
//!
//! The loop alternates turns between two [`Player`]s, prints the board
//! with the mover's legal destinations marked, handles forced passes, and
//! stops when neither side can move.
//!
//! ## Example
//!
//! ```no_run
//! use othello_mcts::board::Piece;
//! use othello_mcts::game::{ComputerPlayer, Game};
//! use othello_mcts::mcts::MctsConfig;
//!
//! let mut black = ComputerPlayer::new(Piece::Black, MctsConfig::with_rollouts(500), false);
//! let mut white = ComputerPlayer::new(Piece::White, MctsConfig::with_rollouts(500), false);
//! let result = Game::new(std::io::stdout()).run(&mut black, &mut white).unwrap();
//! println!("{:?}", result.winner);
//! ```

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::info;

use crate::board::{Board, BoardError, Coord, Piece};
use crate::mcts::{MctsConfig, MctsPlayer, SearchError};
use crate::moves::{LegalMoves, has_moves, legal_moves};

/// Errors that end a game early.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player quit")]
    Quit,

    #[error("input closed")]
    InputClosed,

    #[error("{expected} seat is taken by a {found} player")]
    WrongSide { expected: Piece, found: Piece },

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Something that can pick a move for one side.
pub trait Player {
    fn piece(&self) -> Piece;

    /// Pick one of `moves`. Only called when `moves` is non-empty.
    fn choose_move(&mut self, board: &Board, moves: &LegalMoves) -> Result<Coord, GameError>;
}

fn seat_number(piece: Piece) -> u8 {
    match piece {
        Piece::Black => 1,
        Piece::White => 2,
    }
}

/// A human entering "row col" (1-based) on a text stream.
pub struct HumanPlayer<R, W> {
    piece: Piece,
    input: R,
    output: W,
}

impl HumanPlayer<io::BufReader<io::Stdin>, io::Stdout> {
    /// A human on the process's stdin/stdout.
    ///
    /// Reads never go past the end of the current line, so two humans can
    /// share stdin.
    pub fn stdio(piece: Piece) -> Self {
        Self::new(piece, io::BufReader::with_capacity(1, io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(piece: Piece, input: R, output: W) -> Self {
        Self { piece, input, output }
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn choose_move(&mut self, _board: &Board, moves: &LegalMoves) -> Result<Coord, GameError> {
        loop {
            write!(
                self.output,
                "Player {} please make a move with the {} piece: ",
                seat_number(self.piece),
                self.piece
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(GameError::InputClosed);
            }
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                writeln!(self.output, "\nExiting game...")?;
                return Err(GameError::Quit);
            }

            match line.parse::<Coord>() {
                Ok(c) if moves.contains_key(&c) => return Ok(c),
                _ => writeln!(self.output, "\nInvalid input.\n")?,
            }
        }
    }
}

/// An MCTS engine seated at the table. With `verbose` set, each search
/// report is written to stderr.
pub struct ComputerPlayer {
    engine: MctsPlayer,
    verbose: bool,
}

impl ComputerPlayer {
    pub fn new(piece: Piece, config: MctsConfig, verbose: bool) -> Self {
        Self {
            engine: MctsPlayer::new(piece, config),
            verbose,
        }
    }

    pub fn engine(&self) -> &MctsPlayer {
        &self.engine
    }
}

impl Player for ComputerPlayer {
    fn piece(&self) -> Piece {
        self.engine.piece()
    }

    fn choose_move(&mut self, board: &Board, _moves: &LegalMoves) -> Result<Coord, GameError> {
        let report = self.engine.choose_move(board)?;
        if self.verbose {
            eprintln!("{report}\n");
        }
        Ok(report.mv)
    }
}

/// Final state of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub board: Board,
    /// `None` on a tie.
    pub winner: Option<Piece>,
    pub black: usize,
    pub white: usize,
    pub moves: usize,
}

/// Drives a game between two players, writing progress to `out`.
pub struct Game<W> {
    board: Board,
    out: W,
}

impl<W: Write> Game<W> {
    /// A game from the standard starting position.
    pub fn new(out: W) -> Self {
        Self::from_board(Board::new(), out)
    }

    pub fn from_board(board: Board, out: W) -> Self {
        Self { board, out }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play until neither side can move. Black moves first.
    pub fn run(&mut self, black: &mut dyn Player, white: &mut dyn Player) -> Result<GameResult, GameError> {
        for (seat, player) in [(Piece::Black, black.piece()), (Piece::White, white.piece())] {
            if seat != player {
                return Err(GameError::WrongSide {
                    expected: seat,
                    found: player,
                });
            }
        }

        let mut to_move = Piece::Black;
        let mut moves_played = 0;

        loop {
            let moves = legal_moves(&self.board, to_move);
            if moves.is_empty() {
                if !has_moves(&self.board, to_move.opponent()) {
                    break;
                }
                writeln!(
                    self.out,
                    "\n{to_move} player cannot make a move. Play passes to {} player.",
                    to_move.opponent()
                )?;
                info!(piece = %to_move, "pass");
                to_move = to_move.opponent();
                continue;
            }

            writeln!(self.out, "\n{}", self.board.render_with_hints(&moves))?;

            let player: &mut dyn Player = match to_move {
                Piece::Black => &mut *black,
                Piece::White => &mut *white,
            };
            let mv = player.choose_move(&self.board, &moves)?;
            let captures = moves.get(&mv).ok_or(BoardError::IllegalMove {
                piece: to_move,
                coord: mv,
            })?;
            self.board = self.board.apply(to_move, mv, captures);
            moves_played += 1;

            writeln!(self.out, "{to_move} played {mv}")?;
            info!(piece = %to_move, mv = %mv, flipped = captures.len(), "move");
            to_move = to_move.opponent();
        }

        let result = GameResult {
            board: self.board,
            winner: self.board.winner(),
            black: self.board.count(Piece::Black),
            white: self.board.count(Piece::White),
            moves: moves_played,
        };

        writeln!(self.out, "\n{}", self.board)?;
        match result.winner {
            Some(p) => writeln!(
                self.out,
                "Congratulations to player {p}! You have won the game ({} to {}).",
                result.black.max(result.white),
                result.black.min(result.white)
            )?,
            None => writeln!(
                self.out,
                "Congratulations to both players! The game is a tie ({} to {}).",
                result.black, result.white
            )?,
        }
        info!(winner = ?result.winner, black = result.black, white = result.white, "game over");
        Ok(result)
    }
}
