//! Dialogue and battle panels

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use rpg_core::{BattleView, DialogueView};

use crate::ui::theme::GameTheme;

/// The NPC's current line and numbered options.
pub struct DialogueWidget<'a> {
    view: &'a DialogueView,
    theme: &'a GameTheme,
}

impl<'a> DialogueWidget<'a> {
    pub fn new(view: &'a DialogueView, theme: &'a GameTheme) -> Self {
        Self { view, theme }
    }
}

impl Widget for DialogueWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.view.npc))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let mut lines = vec![
            Line::from(Span::styled(
                self.view.text.as_str(),
                Style::default().fg(self.theme.npc_dialogue),
            )),
            Line::default(),
        ];
        for (i, option) in self.view.options.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", i + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(option.as_str()),
            ]));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// The engaged enemy and the battle hotkeys.
pub struct BattleWidget<'a> {
    view: &'a BattleView,
    theme: &'a GameTheme,
}

impl<'a> BattleWidget<'a> {
    pub fn new(view: &'a BattleView, theme: &'a GameTheme) -> Self {
        Self { view, theme }
    }
}

impl Widget for BattleWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Battle ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.combat_text));

        let lines = vec![
            Line::from(Span::styled(
                self.view.info(),
                self.theme.enemy_style(self.view.kind),
            )),
            Line::default(),
            Line::from("[a] Attack  [d] Defend  [r] Run"),
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
