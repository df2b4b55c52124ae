//! Tile map widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use rpg_core::{GameState, Position};

use crate::ui::theme::GameTheme;

/// Columns used per map cell.
pub const CELL_WIDTH: u16 = 2;

/// Paints terrain, then NPCs, live enemies and the player on top.
pub struct MapWidget<'a> {
    state: &'a GameState,
    theme: &'a GameTheme,
    focused: bool,
}

impl<'a> MapWidget<'a> {
    pub fn new(state: &'a GameState, theme: &'a GameTheme) -> Self {
        Self {
            state,
            theme,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Outer size including the border.
    pub fn size(state: &GameState) -> (u16, u16) {
        let width = state.map.width() as u16 * CELL_WIDTH + 2;
        let height = state.map.height() as u16 + 2;
        (width, height)
    }

    fn cell(&self, pos: Position) -> Span<'static> {
        if self.state.player.position == pos {
            return Span::styled("@ ", self.theme.player_style());
        }
        if let Some(enemy) = self.state.enemy_at(pos) {
            let glyph = match enemy.kind {
                rpg_core::actors::EnemyKind::Goblin => "g ",
                rpg_core::actors::EnemyKind::Skeleton => "s ",
            };
            return Span::styled(glyph, self.theme.enemy_style(enemy.kind));
        }
        if self.state.npc_at(pos).is_some() {
            return Span::styled("N ", self.theme.npc_style());
        }
        match self.state.map.tile_at(pos) {
            Some(tile) => {
                let (glyph, style) = self.theme.tile(tile);
                Span::styled(glyph, style)
            }
            None => Span::raw("  "),
        }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Map ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let lines: Vec<Line> = (0..self.state.map.height() as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..self.state.map.width() as i32)
                    .map(|x| self.cell(Position::new(x, y)))
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
