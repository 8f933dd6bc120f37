//! Engine configuration and difficulty presets.
//!
//! A configuration is resolved once, validated, and then handed to the
//! engines as a read-only value. Unknown difficulty names are an error at
//! resolution time; nothing falls back to a default level.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFENSE_WEIGHT, EXPLORATION, MCTS_ITERATIONS, MCTS_RADIUS, MINIMAX_DEPTH, MINIMAX_RADIUS,
    ROLLOUT_RADIUS, ROLLOUT_STEPS,
};
use crate::patterns::PatternTable;

/// Errors raised while resolving or validating a configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("candidate radius must be at least 1")]
    ZeroRadius,

    #[error("iteration budget must be at least 1")]
    ZeroIterations,

    #[error("exploration constant must be finite and non-negative (got {0})")]
    InvalidExploration(f64),

    #[error("defense weight must be finite and positive (got {0})")]
    InvalidDefenseWeight(f64),

    #[error("pattern score '{stronger}' must be greater than '{weaker}'")]
    PatternOrder {
        stronger: &'static str,
        weaker: &'static str,
    },

    #[error("unknown engine kind '{0}' (expected 'minimax' or 'mcts')")]
    UnknownEngine(String),

    #[error("unknown difficulty '{level}' for {kind}")]
    UnknownDifficulty { kind: EngineKind, level: String },

    #[error("malformed engine choice '{0}' (expected '<kind>:<level>')")]
    MalformedSpec(String),
}

/// Which search engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Minimax,
    Mcts,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Minimax => write!(f, "minimax"),
            EngineKind::Mcts => write!(f, "mcts"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(EngineKind::Minimax),
            "mcts" => Ok(EngineKind::Mcts),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }
}

/// Tunables for the alpha-beta engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxConfig {
    /// Search depth in plies.
    pub depth: u32,
    /// Candidate radius around existing stones.
    pub radius: usize,
    /// Multiplier on the opponent's pattern score.
    pub defense_weight: f64,
    pub patterns: PatternTable,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: MINIMAX_DEPTH,
            radius: MINIMAX_RADIUS,
            defense_weight: DEFENSE_WEIGHT,
            patterns: PatternTable::default(),
        }
    }
}

impl MinimaxConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_defense_weight(mut self, weight: f64) -> Self {
        self.defense_weight = weight;
        self
    }

    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.radius == 0 {
            return Err(ConfigError::ZeroRadius);
        }
        if !self.defense_weight.is_finite() || self.defense_weight <= 0.0 {
            return Err(ConfigError::InvalidDefenseWeight(self.defense_weight));
        }
        self.patterns.validate()
    }
}

/// Tunables for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Select/expand/simulate/backpropagate passes per move.
    pub iterations: u32,
    /// Candidate radius used when expanding tree nodes.
    pub radius: usize,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Candidate radius used inside rollouts.
    pub rollout_radius: usize,
    /// Rollout length cap; hitting it scores as a draw.
    pub rollout_steps: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: MCTS_ITERATIONS,
            radius: MCTS_RADIUS,
            exploration: EXPLORATION,
            rollout_radius: ROLLOUT_RADIUS,
            rollout_steps: ROLLOUT_STEPS,
        }
    }
}

impl MctsConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_rollout_radius(mut self, radius: usize) -> Self {
        self.rollout_radius = radius;
        self
    }

    pub fn with_rollout_steps(mut self, steps: u32) -> Self {
        self.rollout_steps = steps;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.radius == 0 || self.rollout_radius == 0 {
            return Err(ConfigError::ZeroRadius);
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::InvalidExploration(self.exploration));
        }
        Ok(())
    }
}

/// A fully resolved engine choice.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineConfig {
    Minimax(MinimaxConfig),
    Mcts(MctsConfig),
}

impl EngineConfig {
    pub fn kind(&self) -> EngineKind {
        match self {
            EngineConfig::Minimax(_) => EngineKind::Minimax,
            EngineConfig::Mcts(_) => EngineKind::Mcts,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            EngineConfig::Minimax(c) => c.validate(),
            EngineConfig::Mcts(c) => c.validate(),
        }
    }

    /// Resolve a named difficulty level into a validated configuration.
    ///
    /// Minimax accepts `1|2|3` or `easy|medium|hard`; MCTS accepts
    /// `easy|medium|hard`, optionally prefixed with `mcts_`, or `1|2|3`.
    pub fn resolve(kind: EngineKind, level: &str) -> Result<Self, ConfigError> {
        let normalized = level.trim().to_ascii_lowercase();
        let name = normalized.strip_prefix("mcts_").unwrap_or(&normalized);
        let tier = match name {
            "1" | "easy" => 1,
            "2" | "medium" => 2,
            "3" | "hard" => 3,
            _ => {
                return Err(ConfigError::UnknownDifficulty {
                    kind,
                    level: level.to_string(),
                });
            }
        };

        let config = match kind {
            EngineKind::Minimax => {
                let base = MinimaxConfig::default();
                EngineConfig::Minimax(match tier {
                    1 => base.with_depth(1).with_radius(1),
                    2 => base.with_depth(2).with_radius(1),
                    _ => base.with_depth(3).with_radius(2),
                })
            }
            EngineKind::Mcts => {
                let base = MctsConfig::default();
                EngineConfig::Mcts(match tier {
                    1 => base.with_iterations(300),
                    2 => base.with_iterations(1000),
                    _ => base.with_iterations(3000),
                })
            }
        };
        config.validate()?;
        Ok(config)
    }
}

impl FromStr for EngineConfig {
    type Err = ConfigError;

    /// Parse `<kind>:<level>`, e.g. `minimax:2` or `mcts:hard`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, level) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedSpec(s.to_string()))?;
        EngineConfig::resolve(kind.parse()?, level)
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineConfig::Minimax(c) => write!(
                f,
                "minimax depth={} radius={} defense={}",
                c.depth, c.radius, c.defense_weight
            ),
            EngineConfig::Mcts(c) => write!(
                f,
                "mcts iterations={} radius={} c={}",
                c.iterations, c.radius, c.exploration
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_validate() {
        assert!(MinimaxConfig::default().validate().is_ok());
        assert!(MctsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(50)
            .with_exploration(0.6)
            .with_rollout_radius(2)
            .with_rollout_steps(60);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.rollout_radius, 2);
        assert_eq!(config.rollout_steps, 60);
        assert!((config.exploration - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        assert_eq!(
            MinimaxConfig::default().with_depth(0).validate(),
            Err(ConfigError::ZeroDepth)
        );
        assert_eq!(
            MinimaxConfig::default().with_radius(0).validate(),
            Err(ConfigError::ZeroRadius)
        );
        assert_eq!(
            MinimaxConfig::default().with_defense_weight(0.0).validate(),
            Err(ConfigError::InvalidDefenseWeight(0.0))
        );
        assert_eq!(
            MctsConfig::default().with_iterations(0).validate(),
            Err(ConfigError::ZeroIterations)
        );
        assert_eq!(
            MctsConfig::default().with_rollout_radius(0).validate(),
            Err(ConfigError::ZeroRadius)
        );
        assert!(matches!(
            MctsConfig::default().with_exploration(f64::NAN).validate(),
            Err(ConfigError::InvalidExploration(_))
        ));
    }

    #[test]
    fn test_resolve_levels() {
        let c = EngineConfig::resolve(EngineKind::Minimax, "3").unwrap();
        assert_eq!(c, EngineConfig::Minimax(MinimaxConfig::default().with_depth(3).with_radius(2)));

        let c = EngineConfig::resolve(EngineKind::Mcts, "mcts_easy").unwrap();
        assert_eq!(c, EngineConfig::Mcts(MctsConfig::default().with_iterations(300)));

        let c = EngineConfig::resolve(EngineKind::Mcts, "Medium").unwrap();
        assert_eq!(c.kind(), EngineKind::Mcts);
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let err = EngineConfig::resolve(EngineKind::Minimax, "nightmare").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownDifficulty {
                kind: EngineKind::Minimax,
                level: "nightmare".to_string()
            }
        );
    }

    #[test]
    fn test_parse_spec() {
        let c: EngineConfig = "mcts:hard".parse().unwrap();
        assert_eq!(c, EngineConfig::Mcts(MctsConfig::default().with_iterations(3000)));

        assert_eq!(
            "alphazero:1".parse::<EngineConfig>(),
            Err(ConfigError::UnknownEngine("alphazero".to_string()))
        );
        assert_eq!(
            "minimax".parse::<EngineConfig>(),
            Err(ConfigError::MalformedSpec("minimax".to_string()))
        );
    }
}
