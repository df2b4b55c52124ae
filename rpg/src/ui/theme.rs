//! Color theme and styling for the tile RPG TUI

use ratatui::style::{Color, Modifier, Style};
use rpg_core::actors::EnemyKind;
use rpg_core::Tile;

/// Game UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Terrain
    pub grass: Color,
    pub wall: Color,
    pub water: Color,

    // Actors
    pub player: Color,
    pub goblin: Color,
    pub skeleton: Color,
    pub npc: Color,

    // HP colors
    pub hp_healthy: Color,
    pub hp_wounded: Color,
    pub hp_critical: Color,

    // Text colors
    pub npc_dialogue: Color,
    pub combat_text: Color,
    pub reward_text: Color,
    pub system_text: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            grass: Color::Green,
            wall: Color::Gray,
            water: Color::Blue,

            player: Color::LightCyan,
            goblin: Color::LightRed,
            skeleton: Color::White,
            npc: Color::Yellow,

            hp_healthy: Color::Green,
            hp_wounded: Color::Yellow,
            hp_critical: Color::Red,

            npc_dialogue: Color::Yellow,
            combat_text: Color::LightRed,
            reward_text: Color::LightGreen,
            system_text: Color::DarkGray,
        }
    }
}

impl GameTheme {
    /// Glyph and style for a terrain cell. Cells are two columns wide.
    pub fn tile(&self, tile: Tile) -> (&'static str, Style) {
        match tile {
            Tile::Grass => (". ", Style::default().fg(self.grass)),
            Tile::Wall => ("##", Style::default().fg(self.wall)),
            Tile::Water => ("~~", Style::default().fg(self.water)),
        }
    }

    pub fn player_style(&self) -> Style {
        Style::default()
            .fg(self.player)
            .add_modifier(Modifier::BOLD)
    }

    pub fn enemy_style(&self, kind: EnemyKind) -> Style {
        let color = match kind {
            EnemyKind::Goblin => self.goblin,
            EnemyKind::Skeleton => self.skeleton,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn npc_style(&self) -> Style {
        Style::default().fg(self.npc)
    }

    /// Style for a line in the message log, picked from its prefix.
    pub fn message_style(&self, message: &str) -> Style {
        if message.starts_with("NPC:") {
            Style::default().fg(self.npc_dialogue)
        } else if message.starts_with("Quest completed") || message.starts_with("Reward") {
            Style::default()
                .fg(self.reward_text)
                .add_modifier(Modifier::BOLD)
        } else if message.starts_with("You hit")
            || message.starts_with("The ")
            || message.starts_with("You were")
        {
            Style::default().fg(self.combat_text)
        } else {
            Style::default().fg(self.foreground)
        }
    }

    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// HP bar color based on ratio
    pub fn hp_color(&self, ratio: f64) -> Color {
        if ratio > 0.5 {
            self.hp_healthy
        } else if ratio > 0.25 {
            self.hp_wounded
        } else {
            self.hp_critical
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
