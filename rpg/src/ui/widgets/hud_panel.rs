//! HUD panel for sidebar display

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use rpg_core::actors::STARTING_HP;
use rpg_core::Hud;

use crate::ui::theme::GameTheme;

/// Player status: HP bar, gold, level, inventory and quests.
pub struct HudWidget<'a> {
    hud: &'a Hud,
    theme: &'a GameTheme,
    music_on: bool,
}

impl<'a> HudWidget<'a> {
    pub fn new(hud: &'a Hud, theme: &'a GameTheme) -> Self {
        Self {
            hud,
            theme,
            music_on: false,
        }
    }

    pub fn music(mut self, on: bool) -> Self {
        self.music_on = on;
        self
    }
}

impl Widget for HudWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Hero ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // HP bar
                Constraint::Length(1), // Gold / level / mode
                Constraint::Min(0),    // Inventory and quests
            ])
            .split(inner);

        let ratio = (self.hud.hp as f64 / STARTING_HP as f64).clamp(0.0, 1.0);
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.hp_color(ratio)))
            .ratio(ratio)
            .label(format!("HP: {}", self.hud.hp))
            .render(chunks[0], buf);

        let music = if self.music_on { "  ♪" } else { "" };
        let stats = Line::from(vec![
            Span::raw("Gold: "),
            Span::styled(
                self.hud.gold.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  Level: {}  ", self.hud.level)),
            Span::styled(self.hud.mode, Style::default().add_modifier(Modifier::DIM)),
            Span::raw(music),
        ]);
        Paragraph::new(stats).render(chunks[1], buf);

        let mut lines = vec![Line::from(Span::styled(
            "Inventory",
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))];
        if self.hud.inventory.is_empty() {
            lines.push(Line::from(Span::styled("  (empty)", self.theme.system_style())));
        }
        for item in &self.hud.inventory {
            lines.push(Line::from(format!("  {item}")));
        }

        lines.push(Line::from(Span::styled(
            "Quests",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        if self.hud.quests.is_empty() {
            lines.push(Line::from(Span::styled("  (none)", self.theme.system_style())));
        }
        for quest in &self.hud.quests {
            lines.push(Line::from(format!("  {quest}")));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(chunks[2], buf);
    }
}
