//! Monte Carlo Tree Search player with UCB1 move selection.
//!
//! Each call to [`MctsPlayer::choose_move`] runs one real turn:
//!
//! 1. Reconcile: look for the current board among the grandchildren of the
//!    tree kept from the previous turn (our move, then the opponent's reply).
//!    On a hit that subtree becomes the new root; otherwise a fresh tree is
//!    built from the real board.
//! 2. Search: every root child gets one rollout, then rollouts start from
//!    uniformly random root children until the budget runs out. A rollout
//!    expands and descends to random children until a terminal board, then
//!    records win/loss for this player on every node back to the root.
//! 3. Select: the root child with the highest UCB1 score is played.
//!
//! The tree is kept for the next turn.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::board::{Board, Coord, Piece};
use crate::constants::{DEFAULT_THINK_TIME, EXPLORATION, MAX_NODES};
use crate::moves::has_moves;
use crate::node::NodeId;
use crate::tree::SearchTree;

/// How much search to do per move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Run rollouts until this much wall-clock time has passed.
    Time(Duration),
    /// Run exactly this many rollouts (at least one per root child).
    Rollouts(usize),
}

/// Configuration for the MCTS player.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    pub budget: Budget,
    /// Exploration constant in the UCB1 formula.
    pub exploration: f64,
    /// Stop searching early once the tree holds this many nodes.
    pub max_nodes: usize,
    /// Seed for the rollout RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: Budget::Time(DEFAULT_THINK_TIME),
            exploration: EXPLORATION,
            max_nodes: MAX_NODES,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Time-bounded search.
    pub fn with_think_time(think_time: Duration) -> Self {
        Self {
            budget: Budget::Time(think_time),
            ..Self::default()
        }
    }

    /// Fixed number of rollouts per move.
    pub fn with_rollouts(rollouts: usize) -> Self {
        Self {
            budget: Budget::Rollouts(rollouts),
            ..Self::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Source of the current time for deadline checks.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Errors returned by the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{0} has no legal move on this board")]
    NoLegalMoves(Piece),
}

/// How the root for this turn was obtained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// The board was found among the previous tree's grandchildren.
    Reused,
    /// A new tree was built from the real board.
    Rebuilt,
}

/// Statistics for one candidate move at the root.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats {
    pub mv: Coord,
    pub wins: u32,
    pub visits: u32,
    pub score: f64,
    pub winrate: f64,
}

/// Outcome of one search.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub piece: Piece,
    /// The chosen move.
    pub mv: Coord,
    /// Rollouts completed during this call.
    pub rollouts: usize,
    pub reconciliation: Reconciliation,
    /// Nodes in the retained tree.
    pub tree_size: usize,
    pub children: Vec<ChildStats>,
}

impl SearchReport {
    /// Statistics of the chosen move.
    pub fn best(&self) -> Option<&ChildStats> {
        self.children.iter().find(|c| c.mv == self.mv)
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rollouts completed: {}", self.rollouts)?;
        for c in &self.children {
            writeln!(
                f,
                "  move ({}) won {}/{} ({:.1}%) ucb1={:.4}",
                c.mv,
                c.wins,
                c.visits,
                c.winrate * 100.0,
                c.score
            )?;
        }
        let winrate = self.best().map_or(0.0, |c| c.winrate * 100.0);
        write!(f, "{} plays ({}) (winrate {winrate:.1}%)", self.piece, self.mv)
    }
}

/// UCB1 score of a child. Unvisited children score infinity.
pub fn ucb1(wins: u32, visits: u32, ln_total: f64, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let v = visits as f64;
    wins as f64 / v + exploration * (ln_total / v).sqrt()
}

/// An MCTS player for one side, keeping its tree between turns.
pub struct MctsPlayer<C: Clock = SystemClock> {
    piece: Piece,
    config: MctsConfig,
    clock: C,
    rng: fastrand::Rng,
    tree: Option<SearchTree>,
    last_board: Option<Board>,
}

impl MctsPlayer<SystemClock> {
    pub fn new(piece: Piece, config: MctsConfig) -> Self {
        Self::with_clock(piece, config, SystemClock)
    }
}

impl<C: Clock> MctsPlayer<C> {
    pub fn with_clock(piece: Piece, config: MctsConfig, clock: C) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            piece,
            config,
            clock,
            rng,
            tree: None,
            last_board: None,
        }
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The tree retained from the last search, rooted at that turn's board.
    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    /// The real board seen at the start of the last search.
    pub fn last_board(&self) -> Option<&Board> {
        self.last_board.as_ref()
    }

    /// Forget the retained tree, e.g. before a new game.
    pub fn reset(&mut self) {
        self.tree = None;
        self.last_board = None;
    }

    /// Search the given position and pick a move for this player.
    ///
    /// Fails if this player has no legal move; the caller is expected to
    /// handle passes before asking for a move.
    pub fn choose_move(&mut self, board: &Board) -> Result<SearchReport, SearchError> {
        if !has_moves(board, self.piece) {
            return Err(SearchError::NoLegalMoves(self.piece));
        }

        let (mut tree, reconciliation) = self.reconcile(board);
        let root = tree.root();
        let rollouts = self.search(&mut tree);

        let exploration = self.config.exploration;
        let children = root_stats(&tree, root, exploration);
        let mv = select(&children).ok_or(SearchError::NoLegalMoves(self.piece))?;

        debug!(
            piece = %self.piece,
            mv = %mv,
            rollouts,
            nodes = tree.len(),
            ?reconciliation,
            "search complete"
        );
        for c in &children {
            trace!(mv = %c.mv, wins = c.wins, visits = c.visits, score = c.score, "root child");
        }

        let report = SearchReport {
            piece: self.piece,
            mv,
            rollouts,
            reconciliation,
            tree_size: tree.len(),
            children,
        };
        self.tree = Some(tree);
        self.last_board = Some(*board);
        Ok(report)
    }

    /// Reuse the matching grandchild of the previous tree, or build anew.
    fn reconcile(&mut self, board: &Board) -> (SearchTree, Reconciliation) {
        if let Some(prev) = self.tree.take() {
            let hit = prev
                .find_grandchild(board)
                .filter(|&id| prev.get(id).to_move() == self.piece);
            if let Some(id) = hit {
                let mut tree = prev.reroot(id);
                let root = tree.root();
                tree.expand(root);
                debug!(nodes = tree.len(), "reusing subtree");
                return (tree, Reconciliation::Reused);
            }
            debug!("no matching subtree, rebuilding");
        }

        let mut tree = SearchTree::new(*board, self.piece);
        let root = tree.root();
        tree.expand(root);
        (tree, Reconciliation::Rebuilt)
    }

    /// Run rollouts until the budget is spent. Returns the rollout count.
    fn search(&mut self, tree: &mut SearchTree) -> usize {
        let root = tree.root();
        let deadline = match self.config.budget {
            Budget::Time(think) => Some(self.clock.now() + think),
            Budget::Rollouts(_) => None,
        };

        // One rollout per unvisited root child so every child can be scored.
        let mut rollouts = 0;
        for child in tree.children(root).to_vec() {
            if tree.get(child).visits() == 0 {
                self.rollout(tree, child);
                rollouts += 1;
            }
        }

        loop {
            let done = match (self.config.budget, deadline) {
                (Budget::Rollouts(n), _) => rollouts >= n,
                (Budget::Time(_), Some(deadline)) => self.clock.now() >= deadline,
                (Budget::Time(_), None) => true,
            };
            if done {
                break;
            }
            if tree.len() >= self.config.max_nodes {
                warn!(nodes = tree.len(), rollouts, "node limit reached, stopping search");
                break;
            }
            let Some(child) = tree.random_child(root, &mut self.rng) else {
                break;
            };
            self.rollout(tree, child);
            rollouts += 1;
        }
        rollouts
    }

    /// Play randomly from `start` to a terminal node and backpropagate.
    fn rollout(&mut self, tree: &mut SearchTree, start: NodeId) {
        let mut node = start;
        loop {
            tree.expand(node);
            match tree.random_child(node, &mut self.rng) {
                Some(next) => node = next,
                None => break,
            }
        }
        let win = tree.get(node).board().winner() == Some(self.piece);
        tree.backpropagate(node, win);
    }
}

fn root_stats(tree: &SearchTree, root: NodeId, exploration: f64) -> Vec<ChildStats> {
    let children = tree.children(root);
    let total: u64 = children.iter().map(|&c| tree.get(c).visits() as u64).sum();
    let ln_total = (total as f64).ln();

    children
        .iter()
        .filter_map(|&id| {
            let node = tree.get(id);
            Some(ChildStats {
                mv: node.mv()?,
                wins: node.wins(),
                visits: node.visits(),
                score: ucb1(node.wins(), node.visits(), ln_total, exploration),
                winrate: node.winrate(),
            })
        })
        .collect()
}

/// Highest score wins; ties go to the earliest child.
fn select(children: &[ChildStats]) -> Option<Coord> {
    let mut best: Option<&ChildStats> = None;
    for c in children {
        if best.is_none_or(|b| c.score > b.score) {
            best = Some(c);
        }
    }
    best.map(|c| c.mv)
}
