//! Constants for board geometry and search parameters.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Othello is always played on 8x8.
pub const N: usize = 8;

/// Total number of cells on the board.
pub const CELLS: usize = N * N;

/// Row/column deltas for the eight scan directions.
/// Order: North, NE, East, SE, South, SW, West, NW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),  // North
    (-1, 1),  // NE
    (0, 1),   // East
    (1, 1),   // SE
    (1, 0),   // South
    (1, -1),  // SW
    (0, -1),  // West
    (-1, -1), // NW
];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Exploration constant for UCB1 (sqrt(2)).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default thinking time per move.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(3);

/// Thinking time must be strictly greater than this many seconds.
pub const MIN_THINK_SECS: u64 = 2;

/// Default cap on the number of nodes held by the search arena.
///
/// Every rollout expands each node it passes through, so a long think
/// can otherwise grow the tree without bound. A node costs roughly 150
/// bytes plus its share of the parent's child list, so a full arena at
/// this cap holds about 350 MB. A 3 second think in a release build
/// stays under it.
pub const MAX_NODES: usize = 2_000_000;

/// Default number of rollouts per move in the demo.
pub const DEMO_ROLLOUTS: usize = 2000;
