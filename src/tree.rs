//! Arena-backed MCTS tree.
//!
//! All nodes of one search tree are stored in a single `Vec` and linked by
//! [`NodeId`]. Children are owned by the arena, so dropping the tree drops
//! every node; [`SearchTree::reroot`] builds a fresh, compacted arena that
//! keeps only one subtree.

use std::collections::VecDeque;

use crate::board::{Board, Piece};
use crate::moves::legal_moves;
use crate::node::{Node, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SearchTree {
    /// Create a tree holding a single unexpanded root.
    pub fn new(board: Board, to_move: Piece) -> Self {
        Self {
            nodes: vec![Node::new(board, to_move, None, None)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Generate the children of a node. Does nothing if already expanded.
    ///
    /// If the side to move has no legal move, the opponent's moves are used
    /// instead (a forced pass) and the resulting children hand the turn back.
    /// If neither side can move the node ends up with no children and is
    /// terminal.
    pub fn expand(&mut self, id: NodeId) {
        let node = self.get(id);
        if node.expanded {
            return;
        }
        let board = node.board;
        let mut mover = node.to_move;

        let mut moves = legal_moves(&board, mover);
        if moves.is_empty() {
            mover = mover.opponent();
            moves = legal_moves(&board, mover);
        }

        let mut children = Vec::with_capacity(moves.len());
        for (dest, captures) in &moves {
            let child_board = board.apply(mover, *dest, captures);
            let child = Node::new(child_board, mover.opponent(), Some(*dest), Some(id));
            children.push(NodeId(self.nodes.len()));
            self.nodes.push(child);
        }

        let node = self.get_mut(id);
        node.children = children;
        node.expanded = true;
    }

    #[inline]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.get(id).is_terminal()
    }

    /// Pick a child uniformly at random. `None` if the node has no children.
    pub fn random_child(&self, id: NodeId, rng: &mut fastrand::Rng) -> Option<NodeId> {
        let children = self.children(id);
        if children.is_empty() {
            return None;
        }
        Some(children[rng.usize(..children.len())])
    }

    pub fn record_outcome(&mut self, id: NodeId, win: bool) {
        self.get_mut(id).record_outcome(win);
    }

    /// Record a rollout result on `leaf` and every ancestor up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, win: bool) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            self.record_outcome(id, win);
            current = self.get(id).parent;
        }
    }

    /// Find a grandchild of the root whose board equals `board`.
    pub fn find_grandchild(&self, board: &Board) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .flat_map(|&child| self.children(child).iter().copied())
            .find(|&gc| self.get(gc).board == *board)
    }

    /// Make `id` the root of a new tree, discarding everything outside its
    /// subtree. Node statistics and expansion state are carried over.
    pub fn reroot(mut self, id: NodeId) -> SearchTree {
        let mut nodes: Vec<Node> = Vec::new();
        let mut queue = VecDeque::from([(id, None::<NodeId>)]);

        while let Some((old, parent)) = queue.pop_front() {
            let new_id = NodeId(nodes.len());
            let old_children = std::mem::take(&mut self.nodes[old.0].children);

            let mut node = self.nodes[old.0].clone();
            node.parent = parent;
            nodes.push(node);
            if let Some(p) = parent {
                nodes[p.0].children.push(new_id);
            }

            queue.extend(old_children.into_iter().map(|c| (c, Some(new_id))));
        }

        SearchTree {
            nodes,
            root: NodeId(0),
        }
    }
}
