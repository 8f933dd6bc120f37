//! Gomoku search engine: minimax with alpha-beta pruning and Monte Carlo
//! Tree Search behind a single move-selection facade.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and default tunables
//! - [`board`] - Board state, apply/undo and win detection
//! - [`movegen`] - Candidate moves near existing stones
//! - [`patterns`] - Pattern-based position evaluation
//! - [`minimax`] - Alpha-beta search
//! - [`playout`] - Win-first random rollouts
//! - [`mcts`] - Monte Carlo Tree Search with UCB1
//! - [`config`] - Engine configuration and difficulty levels
//! - [`agent`] - Engine dispatch with a legal-move guarantee
//! - [`selfplay`] - Agent-versus-agent games
//! - [`gtp`] - Text protocol front end
//!
//! ## Example
//!
//! ```
//! use gomoku_engine::agent::{Agent, Decision};
//! use gomoku_engine::board::{Board, Move, Player};
//! use gomoku_engine::config::{EngineConfig, EngineKind};
//!
//! let board = Board::from_rows(&[
//!     ".......",
//!     ".......",
//!     "XXXX...",
//!     ".......",
//!     "..OOO..",
//!     ".......",
//!     ".......",
//! ])
//! .unwrap();
//!
//! let config = EngineConfig::resolve(EngineKind::Minimax, "easy").unwrap();
//! let mut agent = Agent::new(config, 42).unwrap();
//! let decision = agent.select_move(&board, Some(Player::Black));
//! assert_eq!(decision, Decision::Play(Move::new(2, 4)));
//! ```

pub mod agent;
pub mod board;
pub mod config;
pub mod constants;
pub mod gtp;
pub mod mcts;
pub mod minimax;
pub mod movegen;
pub mod patterns;
pub mod playout;
pub mod selfplay;
