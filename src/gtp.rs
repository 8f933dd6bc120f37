//! Text protocol front end.
//!
//! The engine speaks the command/response framing of the Go Text Protocol
//! (version 2), which many board GUIs also use for Gomoku. Commands are
//! read one per line and answered with `=` on success or `?` on failure,
//! optionally echoing a numeric command id.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <n>` - Resize and clear the board (5 to 25)
//! - `clear_board` - Reset the board to empty
//! - `play <color> <vertex>` - Place a stone; `pass` is rejected
//! - `genmove <color>` - Choose, play and print a move for `color`
//! - `showboard` - Print the current diagram
//! - `difficulty <kind> <level>` - Switch engine, e.g. `difficulty mcts hard`
//!
//! ## Example
//!
//! ```ignore
//! use gomoku_engine::config::{EngineConfig, EngineKind};
//! use gomoku_engine::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(EngineConfig::resolve(EngineKind::Minimax, "2")?, 0)?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::debug;

use crate::agent::{Agent, Decision};
use crate::board::{Board, Player, parse_vertex, vertex};
use crate::config::{ConfigError, EngineConfig, EngineKind};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "difficulty",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Protocol session state.
pub struct GtpEngine {
    board: Board,
    agent: Agent,
    /// Seed for the next agent built by `difficulty`.
    seed: u64,
}

impl GtpEngine {
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            board: Board::default(),
            agent: Agent::new(config, seed)?,
            seed: seed.wrapping_add(1),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(command = %command, ?args, "protocol command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(arg: &str) -> Option<Player> {
        match arg.to_lowercase().as_str() {
            "b" | "black" | "x" => Some(Player::Black),
            "w" | "white" | "o" => Some(Player::White),
            _ => None,
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                match Board::with_size(size) {
                    Ok(board) => {
                        self.board = board;
                        (true, String::new())
                    }
                    Err(e) => (false, format!("unacceptable size: {e}")),
                }
            }

            "clear_board" => {
                self.board.clear();
                (true, String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(player) = Self::parse_color(args[0]) else {
                    return (false, format!("invalid color: {}", args[0]));
                };
                if args[1].eq_ignore_ascii_case("pass") {
                    return (false, "pass is not allowed".to_string());
                }
                let Some(mv) = parse_vertex(args[1], self.board.size()) else {
                    return (false, format!("invalid vertex: {}", args[1]));
                };
                let outcome = self.board.outcome();
                if outcome.is_over() {
                    return (false, format!("game over: {outcome}"));
                }
                if self.board.apply(mv, player) {
                    (true, String::new())
                } else {
                    (false, "illegal move".to_string())
                }
            }

            "genmove" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Some(player) = Self::parse_color(arg) else {
                    return (false, format!("invalid color: {arg}"));
                };
                match self.agent.select_move(&self.board, Some(player)) {
                    Decision::Play(mv) => {
                        self.board.apply(mv, player);
                        (true, vertex(mv, self.board.size()))
                    }
                    Decision::GameOver(outcome) => (false, format!("game over: {outcome}")),
                }
            }

            "showboard" => (true, format!("\n{}", self.board.to_string().trim_end())),

            "difficulty" => {
                if args.len() < 2 {
                    return (false, "usage: difficulty <minimax|mcts> <level>".to_string());
                }
                let resolved = args[0]
                    .parse::<EngineKind>()
                    .and_then(|kind| EngineConfig::resolve(kind, args[1]))
                    .and_then(|config| Agent::new(config, self.seed));
                match resolved {
                    Ok(agent) => {
                        self.seed = self.seed.wrapping_add(1);
                        let summary = agent.config().to_string();
                        self.agent = agent;
                        (true, summary)
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameOutcome, Move};
    use crate::config::MinimaxConfig;

    fn engine() -> GtpEngine {
        let config = EngineConfig::Minimax(MinimaxConfig::default().with_depth(1).with_radius(1));
        GtpEngine::new(config, 0).unwrap()
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = engine();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "gomoku-engine");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["komi"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine();

        let (success, _) = engine.execute("boardsize", &["9"]);
        assert!(success);
        assert_eq!(engine.board().size(), 9);

        let (success, _) = engine.execute("boardsize", &["4"]);
        assert!(!success);
        let (success, _) = engine.execute("boardsize", &["26"]);
        assert!(!success);
        assert_eq!(engine.board().size(), 9);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = engine();

        let (success, _) = engine.execute("play", &["black", "H8"]);
        assert!(success);
        assert_eq!(engine.board().get(Move::new(7, 7)), Some(Player::Black));

        let (success, response) = engine.execute("play", &["white", "H8"]);
        assert!(!success);
        assert_eq!(response, "illegal move");

        let (success, _) = engine.execute("play", &["white", "pass"]);
        assert!(!success);

        let (success, _) = engine.execute("clear_board", &[]);
        assert!(success);
        assert!(engine.board().is_empty());
    }

    #[test]
    fn test_genmove_plays_a_legal_move() {
        let mut engine = engine();
        let (success, response) = engine.execute("genmove", &["b"]);
        assert!(success);
        assert_eq!(response, "H8");
        assert_eq!(engine.board().get(Move::new(7, 7)), Some(Player::Black));
    }

    #[test]
    fn test_genmove_after_five_reports_game_over() {
        let mut engine = engine();
        for v in ["A1", "B1", "C1", "D1", "E1"] {
            assert!(engine.execute("play", &["w", v]).0);
        }
        assert_eq!(engine.board().outcome(), GameOutcome::Win(Player::White));

        let (success, response) = engine.execute("genmove", &["black"]);
        assert!(!success);
        assert_eq!(response, "game over: white wins");
    }

    #[test]
    fn test_difficulty_switches_engine() {
        let mut engine = engine();
        let (success, response) = engine.execute("difficulty", &["mcts", "easy"]);
        assert!(success);
        assert!(response.starts_with("mcts iterations=300"));

        let (success, _) = engine.execute("difficulty", &["mcts", "insane"]);
        assert!(!success);
        assert_eq!(engine.agent.config().kind(), EngineKind::Mcts);
    }

    #[test]
    fn test_serve_frames_responses() {
        let mut engine = engine();
        let input = b"1 name\n# comment\nfoo\n2 quit\nname\n";
        let mut output = Vec::new();
        engine.serve(&input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "=1 gomoku-engine\n\n? unknown command: foo\n\n=2 \n\n");
    }
}
