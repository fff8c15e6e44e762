//! Line-oriented text console.
//!
//! A minimal front end for playing against the engine from a terminal or
//! driving it from a script. Each command gets one response starting with
//! `=` on success or `?` on failure, followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name` / `version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `clear_board` - Reset to an empty board with X to move
//! - `showboard` - Print the board
//! - `play <column>` - Drop a piece for the player to move
//! - `genmove` - Let the engine move for the player to move
//! - `strategy [mcts|astar]` - Show or switch the search strategy
//! - `quit` - Exit

use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use tracing::debug;

use crate::engine::{Engine, Strategy};
use crate::error::EngineError;
use crate::position::Position;

const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "quit",
    "showboard",
    "strategy",
    "version",
];

pub struct Console {
    engine: Engine,
    pos: Position,
    strategy: Strategy,
}

impl Console {
    pub fn new(engine: Engine, strategy: Strategy) -> Self {
        let pos = Position::new(engine.config().board);
        Self {
            engine,
            pos,
            strategy,
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            writeln!(output, "{prefix} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "clear_board" => {
                self.pos = Position::new(self.engine.config().board);
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.pos.board)),

            "strategy" => match args.first() {
                None => (true, self.strategy_name().to_string()),
                Some(name) => match Strategy::from_str(name, true) {
                    Ok(strategy) => {
                        self.strategy = strategy;
                        (true, self.strategy_name().to_string())
                    }
                    Err(_) => (false, format!("unknown strategy: {name}")),
                },
            },

            "play" => {
                if let Some(over) = self.game_over() {
                    return (false, over);
                }
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(column) = arg.parse::<usize>() else {
                    return (false, format!("invalid column: {arg}"));
                };
                match self.pos.apply_move(column) {
                    Ok(next) => {
                        self.pos = next;
                        (true, self.status())
                    }
                    Err(err) => (false, err.to_string()),
                }
            }

            "genmove" => {
                if let Some(over) = self.game_over() {
                    return (false, over);
                }
                match self.engine.play(&self.pos, self.strategy) {
                    Ok(Some((column, next))) => {
                        debug!(column, strategy = self.strategy_name(), "engine moved");
                        self.pos = next;
                        let status = self.status();
                        if status.is_empty() {
                            (true, column.to_string())
                        } else {
                            (true, format!("{column} {status}"))
                        }
                    }
                    Ok(None) => (false, EngineError::NoLegalMoves.to_string()),
                    Err(err) => (false, err.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn strategy_name(&self) -> &'static str {
        match self.strategy {
            Strategy::Mcts => "mcts",
            Strategy::BestFirst => "astar",
        }
    }

    /// Win or draw message after a move, empty while the game goes on.
    fn status(&self) -> String {
        if let Some(winner) = self.pos.winner() {
            format!("{winner} wins")
        } else if self.pos.is_full() {
            "draw".to_string()
        } else {
            String::new()
        }
    }

    fn game_over(&self) -> Option<String> {
        let status = self.status();
        (!status.is_empty()).then(|| format!("game over: {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::config::EngineConfig;

    fn console() -> Console {
        let mut config = EngineConfig::with_simulations(20);
        config.seed = Some(1);
        Console::new(Engine::new(config).unwrap(), Strategy::Mcts)
    }

    #[test]
    fn test_name_command() {
        let mut console = console();
        let (success, response) = console.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "connect-four-engine");
    }

    #[test]
    fn test_known_command() {
        let mut console = console();
        assert_eq!(console.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(console.execute("known_command", &["komi"]), (true, "false".to_string()));
        assert!(!console.execute("known_command", &[]).0);
    }

    #[test]
    fn test_play_and_clear() {
        let mut console = console();
        let (success, _) = console.execute("play", &["3"]);
        assert!(success);
        assert_eq!(console.position().board.get(5, 3), Some(Player::X));
        assert_eq!(console.position().to_move, Player::O);

        assert!(!console.execute("play", &["9"]).0);
        assert!(!console.execute("play", &["left"]).0);

        let (success, _) = console.execute("clear_board", &[]);
        assert!(success);
        assert!(console.position().legal_moves().len() == 7);
        assert_eq!(console.position().to_move, Player::X);
    }

    #[test]
    fn test_play_reports_win_and_blocks_further_moves() {
        let mut console = console();
        for col in ["0", "1", "0", "1", "0", "1"] {
            assert!(console.execute("play", &[col]).0);
        }
        assert_eq!(console.execute("play", &["0"]), (true, "X wins".to_string()));
        assert!(!console.execute("play", &["2"]).0);
        assert!(!console.execute("genmove", &[]).0);
    }

    #[test]
    fn test_genmove_without_simulations_fails() {
        let config = EngineConfig::with_simulations(0);
        let mut console = Console::new(Engine::new(config).unwrap(), Strategy::Mcts);
        let (success, response) = console.execute("genmove", &[]);
        assert!(!success);
        assert_eq!(response, "No simulations were run, so the search has no move to suggest");
        assert_eq!(console.position().to_move, Player::X);
    }

    #[test]
    fn test_strategy_switch() {
        let mut console = console();
        assert_eq!(console.execute("strategy", &[]), (true, "mcts".to_string()));
        assert_eq!(console.execute("strategy", &["astar"]), (true, "astar".to_string()));
        assert_eq!(console.execute("strategy", &["best-first"]), (true, "astar".to_string()));
        assert!(!console.execute("strategy", &["minimax"]).0);
    }

    #[test]
    fn test_run_genmove_session() {
        let mut console = console();
        let input = b"# comment\nplay 3\ngenmove\nquit\nplay 4\n";
        let mut output = Vec::new();
        console.run(&input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<&str> = text.split("\n\n").filter(|s| !s.is_empty()).collect();
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r.starts_with('=')));
        // Two pieces played, the command after quit is ignored
        assert_eq!(console.position().to_move, Player::X);
    }
}
