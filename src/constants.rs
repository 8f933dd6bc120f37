//! Constants for board geometry, search tunables, and pattern scores.
//!
//! These are the defaults used when a configuration record is built with
//! `Default`. Difficulty presets in [`crate::config`] override the search
//! tunables; the pattern scores can be replaced through
//! [`crate::patterns::PatternTable`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN). Standard Gomoku is played on 15x15.
pub const DEFAULT_SIZE: usize = 15;

/// Smallest supported board. A five must fit on a line.
pub const MIN_SIZE: usize = WIN_LENGTH;

/// Largest supported board. Vertex letters run out past 25 columns.
pub const MAX_SIZE: usize = 25;

/// Number of contiguous stones needed to win.
pub const WIN_LENGTH: usize = 5;

/// Line directions checked by win detection and evaluation:
/// horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default search depth in plies.
pub const MINIMAX_DEPTH: u32 = 2;

/// Default candidate radius for minimax move generation.
pub const MINIMAX_RADIUS: usize = 2;

/// Weight applied to the opponent's pattern score. Values above 1.0 bias the
/// evaluator towards blocking threats over extending its own lines.
pub const DEFENSE_WEIGHT: f64 = 1.5;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of iterations per move.
pub const MCTS_ITERATIONS: u32 = 1000;

/// Default candidate radius for tree expansion.
pub const MCTS_RADIUS: usize = 2;

/// UCB1 exploration constant (sqrt 2).
pub const EXPLORATION: f64 = 1.41;

/// Candidate radius used inside rollouts. Smaller than the tree radius so
/// simulations stay local and fast.
pub const ROLLOUT_RADIUS: usize = 1;

/// Maximum moves per rollout. Running out of steps scores as a draw.
pub const ROLLOUT_STEPS: u32 = 40;

/// Reward for a draw or an exhausted rollout.
pub const DRAW_REWARD: f64 = 0.5;

// =============================================================================
// Pattern Scores (run length x open ends)
// =============================================================================

/// Five or more in a row, any ends.
pub const SCORE_FIVE: f64 = 1_000_000.0;

/// Four with both ends open.
pub const SCORE_OPEN_FOUR: f64 = 100_000.0;

/// Four with one end open.
pub const SCORE_BLOCKED_FOUR: f64 = 10_000.0;

/// Three with both ends open.
pub const SCORE_OPEN_THREE: f64 = 5_000.0;

/// Three with one end open.
pub const SCORE_BLOCKED_THREE: f64 = 100.0;

/// Two with both ends open.
pub const SCORE_OPEN_TWO: f64 = 50.0;

/// Two with one end open.
pub const SCORE_BLOCKED_TWO: f64 = 10.0;

/// Single stone with both ends open.
pub const SCORE_OPEN_ONE: f64 = 5.0;

/// Single stone with one end open.
pub const SCORE_BLOCKED_ONE: f64 = 1.0;
