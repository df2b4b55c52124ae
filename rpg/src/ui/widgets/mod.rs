//! TUI widgets for the tile RPG

pub mod encounter;
pub mod hud_panel;
pub mod map;
pub mod message_log;

pub use encounter::{BattleWidget, DialogueWidget};
pub use hud_panel::HudWidget;
pub use map::MapWidget;
pub use message_log::{LogEntry, LogKind, MessageLogWidget};
