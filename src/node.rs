//! Search tree nodes.
//!
//! Nodes live in a [`SearchTree`](crate::tree::SearchTree) arena and refer
//! to each other by [`NodeId`]. A node owns its board snapshot; the parent
//! link is only an index used for backpropagation.

use crate::board::{Board, Coord, Piece};

/// Index of a node within its tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A hypothetical game state in the search tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) board: Board,
    pub(crate) to_move: Piece,
    pub(crate) mv: Option<Coord>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) wins: u32,
    pub(crate) visits: u32,
    pub(crate) expanded: bool,
}

impl Node {
    pub(crate) fn new(board: Board, to_move: Piece, mv: Option<Coord>, parent: Option<NodeId>) -> Self {
        Self {
            board,
            to_move,
            mv,
            parent,
            children: Vec::new(),
            wins: 0,
            visits: 0,
            expanded: false,
        }
    }

    /// The board snapshot at this node.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side expected to move from this position.
    pub fn to_move(&self) -> Piece {
        self.to_move
    }

    /// The move that produced this node, `None` for a root.
    pub fn mv(&self) -> Option<Coord> {
        self.mv
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Expanded and found no move for either side.
    pub fn is_terminal(&self) -> bool {
        self.expanded && self.children.is_empty()
    }

    /// Count one rollout through this node.
    #[inline]
    pub fn record_outcome(&mut self, win: bool) {
        self.visits += 1;
        if win {
            self.wins += 1;
        }
    }

    /// Fraction of rollouts won, or 0 for an unvisited node.
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }
}
