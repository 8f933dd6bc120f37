//! Minimax search with alpha-beta pruning.
//!
//! The search walks a single mutable board. Every candidate is placed
//! through a [`Placed`] guard that removes the stone when it goes out of
//! scope, so the board is restored on normal returns and on cutoffs alike.
//!
//! Scores are always from the root player's point of view: maximizing plies
//! place the root player's stones, minimizing plies place the opponent's.
//! Candidates are visited in row-major order and a move only replaces the
//! current best when it is strictly better, so the first of several
//! equally good moves wins.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::board::{Board, Move, Player};
use crate::config::MinimaxConfig;
use crate::movegen::generate;
use crate::patterns::evaluate;

/// A stone placed for the duration of one search branch.
struct Placed<'a> {
    board: &'a mut Board,
    mv: Move,
}

impl<'a> Placed<'a> {
    fn new(board: &'a mut Board, mv: Move, player: Player) -> Option<Self> {
        if board.apply(mv, player) {
            Some(Self { board, mv })
        } else {
            None
        }
    }
}

impl Deref for Placed<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Placed<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placed<'_> {
    fn drop(&mut self) {
        self.board.undo(self.mv);
    }
}

/// Result of a root search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxOutcome {
    /// Best move, `None` when there was nothing to search.
    pub best_move: Option<Move>,
    /// Score of the best move for the root player.
    pub score: f64,
    /// Positions visited, including leaves.
    pub nodes: u64,
}

/// Recursive alpha-beta searcher.
pub struct Minimax<'c> {
    config: &'c MinimaxConfig,
    nodes: u64,
    prune: bool,
}

impl<'c> Minimax<'c> {
    pub fn new(config: &'c MinimaxConfig) -> Self {
        Self {
            config,
            nodes: 0,
            prune: true,
        }
    }

    /// A searcher that never cuts off, for checking pruned results.
    pub fn unpruned(config: &'c MinimaxConfig) -> Self {
        Self {
            prune: false,
            ..Self::new(config)
        }
    }

    /// Number of positions visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        evaluate(board, player, &self.config.patterns, self.config.defense_weight)
    }

    /// Search `depth` plies below `board` and return the score for `player`
    /// together with the move that achieves it.
    ///
    /// A move that completes five ends the game, so the position after it is
    /// scored as a leaf regardless of the remaining depth.
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        player: Player,
    ) -> (f64, Option<Move>) {
        self.nodes += 1;

        let moves = generate(board, self.config.radius);
        if depth == 0 || moves.is_empty() {
            return (self.evaluate(board, player), None);
        }

        let mover = if maximizing { player } else { player.opponent() };
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for mv in moves {
            let Some(mut placed) = Placed::new(&mut *board, mv, mover) else {
                continue;
            };
            let score = if placed.win_at(mv, mover) {
                self.nodes += 1;
                self.evaluate(&placed, player)
            } else {
                self.search(&mut placed, depth - 1, alpha, beta, !maximizing, player)
                    .0
            };
            drop(placed);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if self.prune && beta <= alpha {
                break;
            }
        }

        (best_score, best_move)
    }

    /// Full-window search from the root for `player`.
    pub fn run(&mut self, board: &mut Board, player: Player) -> MinimaxOutcome {
        self.nodes = 0;
        let (score, best_move) = self.search(
            board,
            self.config.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            player,
        );
        MinimaxOutcome {
            best_move,
            score,
            nodes: self.nodes,
        }
    }
}

/// Pick a move for `player` with alpha-beta search.
pub fn choose(board: &mut Board, player: Player, config: &MinimaxConfig) -> MinimaxOutcome {
    let outcome = Minimax::new(config).run(board, player);
    debug!(
        engine = "minimax",
        depth = config.depth,
        radius = config.radius,
        best_move = ?outcome.best_move,
        score = outcome.score,
        nodes = outcome.nodes,
        "minimax search complete"
    );
    outcome
}

/// Pick a move for `player` with plain minimax (no cutoffs).
pub fn choose_unpruned(board: &mut Board, player: Player, config: &MinimaxConfig) -> MinimaxOutcome {
    Minimax::unpruned(config).run(board, player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> Board {
        Board::from_rows(&[
            "...............",
            "...............",
            "...............",
            "...............",
            "...............",
            "......O........",
            "......XX.......",
            ".......XO......",
            "........O......",
            "...............",
            "...............",
            "...............",
            "...............",
            "...............",
            "...............",
        ])
        .unwrap()
    }

    #[test]
    fn test_guard_undoes_on_drop() {
        let mut board = Board::new(15);
        {
            let placed = Placed::new(&mut board, Move::new(1, 1), Player::Black).unwrap();
            assert_eq!(placed.get(Move::new(1, 1)), Some(Player::Black));
        }
        assert!(board.is_empty());
        assert!(Placed::new(&mut board, Move::new(20, 1), Player::Black).is_none());
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let config = MinimaxConfig::default().with_depth(3).with_radius(1);
        let mut board = position();
        let before = board.clone();
        choose(&mut board, Player::Black, &config);
        assert_eq!(board, before);
    }

    #[test]
    fn test_depth_zero_is_static_evaluation() {
        let config = MinimaxConfig::default();
        let mut board = position();
        let expected = evaluate(&board, Player::White, &config.patterns, config.defense_weight);
        let mut searcher = Minimax::new(&config);
        let (score, mv) = searcher.search(
            &mut board,
            0,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            Player::White,
        );
        assert_eq!(mv, None);
        assert_eq!(score, expected);
        assert_eq!(searcher.nodes(), 1);
    }

    #[test]
    fn test_pruning_matches_full_minimax() {
        for depth in 1..=3 {
            let config = MinimaxConfig::default().with_depth(depth).with_radius(1);
            for player in [Player::Black, Player::White] {
                let mut board = position();
                let pruned = choose(&mut board, player, &config);
                let full = choose_unpruned(&mut board, player, &config);
                assert_eq!(pruned.best_move, full.best_move, "depth {depth} {player}");
                assert_eq!(pruned.score, full.score, "depth {depth} {player}");
                assert!(pruned.nodes <= full.nodes);
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let config = MinimaxConfig::default().with_depth(3).with_radius(1);
        let mut board = position();
        let pruned = choose(&mut board, Player::Black, &config);
        let full = choose_unpruned(&mut board, Player::Black, &config);
        assert!(pruned.nodes < full.nodes, "{} vs {}", pruned.nodes, full.nodes);
    }

    #[test]
    fn test_repeated_searches_agree() {
        let config = MinimaxConfig::default().with_depth(2).with_radius(2);
        let mut board = position();
        let first = choose(&mut board, Player::White, &config);
        for _ in 0..3 {
            assert_eq!(choose(&mut board, Player::White, &config), first);
        }
    }
}
