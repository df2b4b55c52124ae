//! Headless game interface for programmatic use.
//!
//! Drives a [`GameSession`] with one text command per turn. Useful for:
//! - Script-driven sessions piped through stdin
//! - Integration tests that read like a play log
//!
//! # Example
//!
//! ```ignore
//! use rpg_core::headless::{Command, HeadlessGame};
//! use rpg_core::SessionConfig;
//!
//! let mut game = HeadlessGame::new(SessionConfig::new().with_seed(7)).await?;
//! let response = game.execute("right".parse()?).await?;
//! for line in &response.messages {
//!     println!("{line}");
//! }
//! ```

use crate::battle::BattleAction;
use crate::grid::Direction;
use crate::session::{GameSession, Response, SessionConfig, SessionError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text shown by the `help` command.
pub const HELP_TEXT: &[&str] = &[
    "Commands:",
    "  up | down | left | right   move (also w a s d)",
    "  attack | defend | run      battle actions",
    "  choose <n>                 pick dialogue option n (starting at 1)",
    "  save | load                write or restore the save slot",
    "  music                      toggle background music",
    "  status                     show the HUD",
    "  help                       show this text",
    "  quit                       leave the game",
];

/// One player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Battle(BattleAction),
    /// Zero-based option index.
    Choose(usize),
    Save,
    Load,
    Music,
    Status,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: choose <n> with n starting at 1")]
    BadOption,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(word) = words.next() else {
            return Err(CommandParseError::Empty);
        };

        let command = match word.to_lowercase().as_str() {
            "up" | "w" => Command::Move(Direction::Up),
            "down" | "s" => Command::Move(Direction::Down),
            "left" | "a" => Command::Move(Direction::Left),
            "right" | "d" => Command::Move(Direction::Right),
            "attack" => Command::Battle(BattleAction::Attack),
            "defend" => Command::Battle(BattleAction::Defend),
            "run" => Command::Battle(BattleAction::Run),
            "choose" => {
                let n: usize = words
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or(CommandParseError::BadOption)?;
                if n == 0 {
                    return Err(CommandParseError::BadOption);
                }
                Command::Choose(n - 1)
            }
            "save" => Command::Save,
            "load" => Command::Load,
            "music" => Command::Music,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(direction) => write!(f, "{direction}"),
            Command::Battle(action) => write!(f, "{action}"),
            Command::Choose(index) => write!(f, "choose {}", index + 1),
            Command::Save => write!(f, "save"),
            Command::Load => write!(f, "load"),
            Command::Music => write!(f, "music"),
            Command::Status => write!(f, "status"),
            Command::Help => write!(f, "help"),
            Command::Quit => write!(f, "quit"),
        }
    }
}

/// An entry in the game transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub command: Command,
    /// Messages the command produced.
    pub messages: Vec<String>,
    pub turn: usize,
}

/// A game controlled by text commands.
pub struct HeadlessGame {
    session: GameSession,
    transcript: Vec<TranscriptEntry>,
    finished: bool,
}

impl HeadlessGame {
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::from_session(GameSession::new(config).await?))
    }

    pub fn from_session(session: GameSession) -> Self {
        Self {
            session,
            transcript: Vec::new(),
            finished: false,
        }
    }

    /// Run one command and record it in the transcript.
    pub async fn execute(&mut self, command: Command) -> Result<Response, SessionError> {
        let response = match command {
            Command::Move(direction) => self.session.move_player(direction),
            Command::Battle(action) => self.session.battle_action(action)?,
            Command::Choose(index) => self.session.choose_option(index)?,
            Command::Save => self.session.save().await?,
            Command::Load => self.session.load().await?,
            Command::Music => self.session.toggle_music(),
            Command::Status => Response {
                messages: self.status_lines(),
                ..Response::default()
            },
            Command::Help => Response {
                messages: HELP_TEXT.iter().map(|s| s.to_string()).collect(),
                ..Response::default()
            },
            Command::Quit => {
                self.finished = true;
                Response {
                    messages: vec!["Goodbye.".to_string()],
                    ..Response::default()
                }
            }
        };

        self.transcript.push(TranscriptEntry {
            command,
            messages: response.messages.clone(),
            turn: self.transcript.len() + 1,
        });

        Ok(response)
    }

    /// HUD, position and the open dialogue or battle, one item per line.
    pub fn status_lines(&self) -> Vec<String> {
        let hud = self.session.hud();
        let mut lines = vec![
            format!(
                "HP: {} | Gold: {} | Level: {} | Mode: {}",
                hud.hp, hud.gold, hud.level, hud.mode
            ),
            format!("Position: {}", self.session.state().player.position),
        ];

        if !hud.inventory.is_empty() {
            lines.push(format!("Inventory: {}", hud.inventory.join(", ")));
        }
        if !hud.quests.is_empty() {
            lines.push(format!("Quests: {}", hud.quests.join(", ")));
        }
        if let Some(enemy) = hud.enemy {
            lines.push(format!("Enemy: {enemy}"));
        }
        if let Some(view) = self.session.dialogue_view() {
            lines.push(format!("NPC: {}", view.text));
            for (i, option) in view.options.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, option));
            }
        }
        lines
    }

    /// True once `quit` has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn last_messages(&self) -> Option<&[String]> {
        self.transcript.last().map(|e| e.messages.as_slice())
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> HeadlessGame {
        let content = Content::builtin().unwrap();
        HeadlessGame::from_session(GameSession::with_content(
            content,
            StdRng::seed_from_u64(3),
        ))
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!("up".parse(), Ok(Command::Move(Direction::Up)));
        assert_eq!("D".parse(), Ok(Command::Move(Direction::Right)));
        assert_eq!("  left ".parse(), Ok(Command::Move(Direction::Left)));
    }

    #[test]
    fn test_parse_choose_is_one_based() {
        assert_eq!("choose 1".parse(), Ok(Command::Choose(0)));
        assert_eq!("choose 3".parse(), Ok(Command::Choose(2)));
        assert_eq!(
            "choose 0".parse::<Command>(),
            Err(CommandParseError::BadOption)
        );
        assert_eq!(
            "choose".parse::<Command>(),
            Err(CommandParseError::BadOption)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandParseError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for command in [
            Command::Move(Direction::Down),
            Command::Battle(BattleAction::Run),
            Command::Choose(1),
            Command::Status,
        ] {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }

    #[tokio::test]
    async fn test_transcript() {
        let mut game = game();
        game.execute(Command::Move(Direction::Right)).await.unwrap();
        game.execute(Command::Status).await.unwrap();

        assert_eq!(game.transcript().len(), 2);
        assert_eq!(game.transcript()[1].turn, 2);
        let status = game.last_messages().unwrap();
        assert!(status[0].starts_with("HP: 100"));
        assert_eq!(status[1], "Position: (2, 1)");
    }

    #[tokio::test]
    async fn test_quit() {
        let mut game = game();
        assert!(!game.is_finished());
        game.execute(Command::Quit).await.unwrap();
        assert!(game.is_finished());
    }

    #[tokio::test]
    async fn test_battle_command_outside_battle() {
        let mut game = game();
        let err = game
            .execute(Command::Battle(BattleAction::Attack))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotInBattle));
        assert!(game.transcript().is_empty());
    }
}
