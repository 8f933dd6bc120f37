//! Monte Carlo rollouts (quick game simulation).
//!
//! A rollout plays the game forward from a position with a cheap policy:
//! take an immediate five if one is available, otherwise play a uniformly
//! random cell near the existing stones. Rollouts are capped at a fixed
//! number of steps; running out of steps counts as a draw.

use fastrand::Rng;

use crate::board::{Board, GameOutcome, Move, Player};
use crate::movegen::generate;

/// Find a move among `moves` that completes five for `player`.
pub fn winning_move(board: &mut Board, moves: &[Move], player: Player) -> Option<Move> {
    moves.iter().copied().find(|&mv| {
        if !board.apply(mv, player) {
            return false;
        }
        let wins = board.win_at(mv, player);
        board.undo(mv);
        wins
    })
}

/// Play out the game on `board` with `to_move` starting.
///
/// The board is consumed as scratch space. Returns the winner, or
/// [`GameOutcome::Draw`] if the board fills up or `max_steps` moves pass
/// without a five.
pub fn rollout(
    board: &mut Board,
    mut to_move: Player,
    radius: usize,
    max_steps: u32,
    rng: &mut Rng,
) -> GameOutcome {
    for _ in 0..max_steps {
        let moves = generate(board, radius);
        if moves.is_empty() {
            return GameOutcome::Draw;
        }

        let mv = match winning_move(board, &moves, to_move) {
            Some(mv) => mv,
            None => moves[rng.usize(..moves.len())],
        };
        board.apply(mv, to_move);
        if board.win_at(mv, to_move) {
            return GameOutcome::Win(to_move);
        }

        to_move = to_move.opponent();
    }
    GameOutcome::Draw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winning_move_found_and_board_restored() {
        let mut board = Board::from_rows(&[
            ".......",
            ".XXXX..",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
        ])
        .unwrap();
        let before = board.clone();
        let moves = generate(&board, 1);
        assert_eq!(winning_move(&mut board, &moves, Player::Black), Some(Move::new(1, 0)));
        assert_eq!(winning_move(&mut board, &moves, Player::White), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_rollout_takes_immediate_win() {
        let mut rng = Rng::with_seed(7);
        let mut board = Board::from_rows(&[
            ".......",
            ".OOOO..",
            ".......",
            ".......",
            ".XXX...",
            ".......",
            ".......",
        ])
        .unwrap();
        let outcome = rollout(&mut board, Player::White, 1, 40, &mut rng);
        assert_eq!(outcome, GameOutcome::Win(Player::White));
    }

    #[test]
    fn test_rollout_step_budget_is_a_draw() {
        let mut rng = Rng::with_seed(11);
        let mut board = Board::new(15);
        assert_eq!(rollout(&mut board, Player::Black, 1, 0, &mut rng), GameOutcome::Draw);
        assert!(board.is_empty());

        let mut board = Board::new(15);
        assert_eq!(rollout(&mut board, Player::Black, 1, 3, &mut rng), GameOutcome::Draw);
        assert_eq!(board.stone_count(Player::Black), 2);
        assert_eq!(board.stone_count(Player::White), 1);
    }

    #[test]
    fn test_rollout_is_reproducible() {
        let start = Board::from_rows(&[
            "..........",
            "..........",
            "..........",
            "....X.....",
            "....OX....",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ])
        .unwrap();
        let mut a = start.clone();
        let mut b = start.clone();
        let ra = rollout(&mut a, Player::White, 1, 60, &mut Rng::with_seed(3));
        let rb = rollout(&mut b, Player::White, 1, 60, &mut Rng::with_seed(3));
        assert_eq!(ra, rb);
        assert_eq!(a, b);
    }
}
