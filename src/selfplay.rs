//! Agent-versus-agent games.
//!
//! Used by the `selfplay` subcommand to compare engines and difficulty
//! levels against each other.

use thiserror::Error;
use tracing::info;

use crate::agent::{Agent, Decision};
use crate::board::{Board, BoardError, GameOutcome, Move, Player};
use crate::config::{ConfigError, EngineConfig};

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    /// Moves in play order, Black first.
    pub moves: Vec<Move>,
}

/// Results of a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub black_wins: u32,
    pub white_wins: u32,
    pub draws: u32,
}

impl MatchTally {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Player::Black) => self.black_wins += 1,
            GameOutcome::Win(Player::White) => self.white_wins += 1,
            GameOutcome::Draw | GameOutcome::InProgress => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.black_wins + self.white_wins + self.draws
    }
}

/// Play one game on an empty `size`×`size` board until it is decided.
pub fn play_game(
    black: &mut Agent,
    white: &mut Agent,
    size: usize,
) -> Result<GameRecord, BoardError> {
    let mut board = Board::with_size(size)?;
    let mut moves = Vec::new();
    let mut to_move = Player::Black;

    let outcome = loop {
        let agent = match to_move {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };
        match agent.select_move(&board, Some(to_move)) {
            Decision::GameOver(outcome) => break outcome,
            Decision::Play(mv) => {
                board.apply(mv, to_move);
                moves.push(mv);
                if board.win_at(mv, to_move) {
                    break GameOutcome::Win(to_move);
                }
                if board.is_full() {
                    break GameOutcome::Draw;
                }
            }
        }
        to_move = to_move.opponent();
    };

    Ok(GameRecord { outcome, moves })
}

/// Play `games` games between two configurations.
///
/// Each game gets fresh agents with seeds derived from `seed`, so a match
/// is reproducible.
pub fn run_match(
    black: &EngineConfig,
    white: &EngineConfig,
    games: u32,
    size: usize,
    seed: u64,
) -> Result<MatchTally, SelfPlayError> {
    let mut tally = MatchTally::default();
    for game in 0..games {
        let base = seed.wrapping_add(2 * u64::from(game));
        let mut black_agent = Agent::new(black.clone(), base)?;
        let mut white_agent = Agent::new(white.clone(), base.wrapping_add(1))?;

        let record = play_game(&mut black_agent, &mut white_agent, size)?;
        info!(
            game = game + 1,
            outcome = %record.outcome,
            moves = record.moves.len(),
            "self-play game finished"
        );
        tally.record(record.outcome);
    }
    Ok(tally)
}
