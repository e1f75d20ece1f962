//! Othello-MCTS: an Othello (Reversi) engine driven by Monte Carlo Tree Search.
//!
//! The engine searches a tree of hypothetical futures built from random
//! rollouts, under a wall-clock or rollout budget, and picks its move with
//! the UCB1 formula. The tree is kept between turns and reused when the
//! opponent plays a reply the search already explored.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and search parameters
//! - [`board`] - Board snapshots, pieces, coordinates, scoring
//! - [`moves`] - Legal move and capture enumeration
//! - [`node`] - Search tree nodes and their statistics
//! - [`tree`] - Arena holding a search tree (expansion, backpropagation, re-rooting)
//! - [`mcts`] - The MCTS player (reconciliation, rollouts, UCB1 selection)
//! - [`game`] - Game loop with human and computer players
//!
//! ## Example
//!
//! ```
//! use othello_mcts::board::{Board, Piece};
//! use othello_mcts::mcts::{MctsConfig, MctsPlayer};
//!
//! let board = Board::new();
//! let mut engine = MctsPlayer::new(Piece::Black, MctsConfig::with_rollouts(200));
//! let report = engine.choose_move(&board).unwrap();
//! let board = board.play(Piece::Black, report.mv).unwrap();
//! println!("{board}");
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod mcts;
pub mod moves;
pub mod node;
pub mod tree;
