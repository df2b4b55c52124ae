//! Message log widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// Whether a log line came from the game or from the frontend itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Game,
    System,
}

/// A single line in the message log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
}

/// Shows the newest entries that fit, oldest at the top.
pub struct MessageLogWidget<'a> {
    entries: &'a [LogEntry],
    theme: &'a GameTheme,
}

impl<'a> MessageLogWidget<'a> {
    pub fn new(entries: &'a [LogEntry], theme: &'a GameTheme) -> Self {
        Self { entries, theme }
    }
}

impl Widget for MessageLogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Messages ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let visible = block.inner(area).height as usize;
        let start = self.entries.len().saturating_sub(visible);

        let lines: Vec<Line> = self.entries[start..]
            .iter()
            .map(|entry| {
                let style = match entry.kind {
                    LogKind::Game => self.theme.message_style(&entry.text),
                    LogKind::System => self.theme.system_style(),
                };
                Line::styled(entry.text.as_str(), style)
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
