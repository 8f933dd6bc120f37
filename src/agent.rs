//! The move-selection entry point.
//!
//! An [`Agent`] owns a validated [`EngineConfig`] and a seeded random source.
//! [`Agent::select_move`] checks whether the game is already over, runs the
//! configured engine, and makes sure the caller always gets a legal move
//! back: if the engine returns nothing usable, a random empty cell is played
//! instead.

use fastrand::Rng;
use tracing::warn;

use crate::board::{Board, GameOutcome, Move, Player};
use crate::config::{ConfigError, EngineConfig};
use crate::{mcts, minimax};

/// What the agent decided for the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Play this move.
    Play(Move),
    /// The game is already decided; no search was run.
    GameOver(GameOutcome),
}

pub struct Agent {
    config: EngineConfig,
    rng: Rng,
}

impl Agent {
    /// Create an agent, rejecting invalid configurations up front.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    pub fn with_rng(config: EngineConfig, rng: Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Choose a move on `board`.
    ///
    /// `to_move` should be passed by callers that track turns; when it is
    /// `None` the side is inferred from stone counts.
    pub fn select_move(&mut self, board: &Board, to_move: Option<Player>) -> Decision {
        let outcome = board.outcome();
        if outcome.is_over() {
            return Decision::GameOver(outcome);
        }
        let player = to_move.unwrap_or_else(|| board.infer_turn());

        let proposed = match &self.config {
            EngineConfig::Minimax(cfg) => {
                let mut scratch = board.clone();
                minimax::choose(&mut scratch, player, cfg).best_move
            }
            EngineConfig::Mcts(cfg) => mcts::choose(board, player, cfg, &mut self.rng).best_move,
        };

        self.settle(board, proposed)
    }

    /// Turn an engine proposal into a decision, replacing a missing or
    /// illegal move with a random empty cell.
    fn settle(&mut self, board: &Board, proposed: Option<Move>) -> Decision {
        match proposed {
            Some(mv) if board.is_legal(mv) => Decision::Play(mv),
            other => {
                warn!(
                    engine = %self.config.kind(),
                    proposed = ?other,
                    "engine gave no legal move, playing a random cell"
                );
                match self.random_legal(board) {
                    Some(mv) => Decision::Play(mv),
                    None => Decision::GameOver(GameOutcome::Draw),
                }
            }
        }
    }

    fn random_legal(&mut self, board: &Board) -> Option<Move> {
        let empty: Vec<Move> = board.empty_cells().collect();
        (!empty.is_empty()).then(|| empty[self.rng.usize(..empty.len())])
    }
}
