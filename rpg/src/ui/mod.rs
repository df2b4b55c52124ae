//! UI module for the tile RPG TUI

pub mod render;
pub mod theme;
pub mod widgets;
