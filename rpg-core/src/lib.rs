//! Tile RPG game engine.
//!
//! This crate provides:
//! - A fixed tile map with enemies and NPCs
//! - Branching dialogue trees loaded from data files
//! - Turn-based battles resolved through an Action/Effect pipeline
//! - Gold-goal quests with item rewards
//! - Whole-state save and load into named slots
//!
//! # Quick Start
//!
//! ```ignore
//! use rpg_core::{Direction, GameSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new().with_seed(42);
//!     let mut session = GameSession::new(config).await?;
//!
//!     let response = session.move_player(Direction::Right);
//!     for line in &response.messages {
//!         println!("{line}");
//!     }
//!
//!     session.save().await?;
//!     Ok(())
//! }
//! ```

pub mod actors;
pub mod battle;
pub mod content;
pub mod dialogue;
pub mod dice;
pub mod grid;
pub mod headless;
pub mod hud;
pub mod persist;
pub mod quest;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use battle::{BattleAction, BattleOutcome, BattleView, Effect};
pub use content::{Content, ContentError};
pub use dialogue::{DialogueError, DialogueView};
pub use grid::{Direction, Position, Tile, TileMap};
pub use headless::{Command, CommandParseError, HeadlessGame};
pub use hud::Hud;
pub use persist::{FileSaveStore, MemorySaveStore, PersistError, SaveStore};
pub use session::{Cue, GameSession, Response, SessionConfig, SessionError};
pub use testing::TestHarness;
pub use world::{GameState, Mode};
