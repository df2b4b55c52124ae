//! Render orchestration for the tile RPG TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::widgets::{BattleWidget, DialogueWidget, HudWidget, MapWidget, MessageLogWidget};

/// Height of the dialogue or battle panel.
const ENCOUNTER_HEIGHT: u16 = 9;

/// Height of the HUD panel.
const HUD_HEIGHT: u16 = 12;

const HELP_LINES: &[&str] = &[
    "Arrow keys   move / bump to talk or fight",
    "1-9          pick a dialogue option",
    "a / d / r    attack, defend, run",
    "s / l        save, load",
    "m            toggle music",
    "?            this help",
    "q / Esc      quit",
];

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Map + sidebar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_title_bar(frame, app, rows[0]);

    let state = app.session.state();
    let (map_width, map_height) = MapWidget::size(state);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(map_width), Constraint::Min(30)])
        .split(rows[1]);

    let map_area = Rect {
        height: columns[0].height.min(map_height),
        ..columns[0]
    };
    frame.render_widget(
        MapWidget::new(state, &app.theme).focused(app.session.mode().is_exploring()),
        map_area,
    );

    render_sidebar(frame, app, columns[1]);
    render_status_bar(frame, app, rows[2]);

    if app.show_help {
        render_help(frame, app, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Tile RPG ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("- {}", app.session.mode()),
            app.theme.system_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let dialogue = app.session.dialogue_view();
    let battle = app.session.battle_view();
    let encounter_height = if dialogue.is_some() || battle.is_some() {
        ENCOUNTER_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HUD_HEIGHT),
            Constraint::Length(encounter_height),
            Constraint::Min(3),
        ])
        .split(area);

    let hud = app.session.hud();
    frame.render_widget(
        HudWidget::new(&hud, &app.theme).music(app.session.music_on()),
        chunks[0],
    );

    if let Some(view) = &dialogue {
        frame.render_widget(DialogueWidget::new(view, &app.theme), chunks[1]);
    } else if let Some(view) = &battle {
        frame.render_widget(BattleWidget::new(view, &app.theme), chunks[1]);
    }

    frame.render_widget(MessageLogWidget::new(&app.log, &app.theme), chunks[2]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = app
        .status()
        .unwrap_or("? help  s save  l load  m music  q quit");
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {text}"), app.theme.system_style())),
        area,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let width = 50.min(area.width);
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(" Help - any key to close ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
