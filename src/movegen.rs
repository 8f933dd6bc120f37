//! Candidate move generation.
//!
//! Only cells near existing stones can take part in a five, so both engines
//! restrict their branching to empty cells within a small Chebyshev radius of
//! the stones already on the board. On a 15x15 board this cuts roughly 225
//! options down to 20-40.

use crate::board::{Board, Move};

/// Empty cells within `radius` (Chebyshev distance) of any stone, in
/// row-major order.
///
/// An empty board yields just the center cell; a full board yields nothing.
pub fn generate(board: &Board, radius: usize) -> Vec<Move> {
    if board.is_empty() {
        return vec![board.center()];
    }

    let size = board.size();
    let mut near = vec![false; size * size];
    for (mv, _) in board.stones() {
        let r_min = mv.row.saturating_sub(radius);
        let r_max = (mv.row + radius).min(size - 1);
        let c_min = mv.col.saturating_sub(radius);
        let c_max = (mv.col + radius).min(size - 1);
        for r in r_min..=r_max {
            for c in c_min..=c_max {
                near[r * size + c] = true;
            }
        }
    }

    board
        .empty_cells()
        .filter(|mv| near[mv.row * size + mv.col])
        .collect()
}
