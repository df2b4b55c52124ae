//! Main application state and logic

use rpg_core::{BattleAction, Cue, Direction, GameSession, Response, SessionError};

use crate::ui::theme::GameTheme;
use crate::ui::widgets::{LogEntry, LogKind};

/// Oldest log entries are dropped past this many.
const MAX_LOG_ENTRIES: usize = 200;

/// Main application state
pub struct App {
    pub session: GameSession,

    // UI state
    pub theme: GameTheme,
    pub show_help: bool,

    // Message log
    pub log: Vec<LogEntry>,

    // Status
    status_message: Option<String>,

    // Save/load run from the main loop because they await the store
    pub pending_save: bool,
    pub pending_load: bool,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        let mut app = Self {
            session,
            theme: GameTheme::default(),
            show_help: false,
            log: Vec::new(),
            status_message: None,
            pending_save: false,
            pending_load: false,
        };

        app.add_log(
            "You wake in a quiet field. Arrow keys to move, '?' for help.",
            LogKind::System,
        );
        app
    }

    pub fn add_log(&mut self, text: impl Into<String>, kind: LogKind) {
        self.log.push(LogEntry {
            text: text.into(),
            kind,
        });
        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..excess);
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ========================================================================
    // Game actions
    // ========================================================================

    pub fn move_player(&mut self, direction: Direction) {
        let response = self.session.move_player(direction);
        self.apply(response);
    }

    pub fn battle(&mut self, action: BattleAction) {
        let result = self.session.battle_action(action);
        self.apply_result(result);
    }

    pub fn choose(&mut self, index: usize) {
        let result = self.session.choose_option(index);
        self.apply_result(result);
    }

    pub fn toggle_music(&mut self) {
        let response = self.session.toggle_music();
        self.apply(response);
    }

    /// Run a queued save or load.
    pub async fn run_pending_io(&mut self) {
        if std::mem::take(&mut self.pending_save) {
            let result = self.session.save().await;
            self.apply_result(result);
        }
        if std::mem::take(&mut self.pending_load) {
            let result = self.session.load().await;
            self.apply_result(result);
        }
    }

    fn apply_result(&mut self, result: Result<Response, SessionError>) {
        match result {
            Ok(response) => self.apply(response),
            Err(e) => self.report_error(&e),
        }
    }

    /// Log a response's messages and show its cues in the status bar.
    pub fn apply(&mut self, response: Response) {
        for message in response.messages {
            self.add_log(message, LogKind::Game);
        }
        if let Some(cue) = response.cues.last() {
            self.set_status(cue_text(*cue));
        }
    }

    fn report_error(&mut self, error: &SessionError) {
        tracing::warn!(%error, "action failed");
        let text = match error {
            SessionError::NoSave(_) => "No save found.".to_string(),
            other => format!("Error: {other}"),
        };
        self.add_log(text.clone(), LogKind::System);
        self.set_status(text);
    }
}

/// Status-bar text standing in for an audio cue.
pub fn cue_text(cue: Cue) -> &'static str {
    match cue {
        Cue::Attack => "*clang*",
        Cue::Win => "♪ Victory! ♪",
        Cue::MusicOn => "♪ Music on",
        Cue::MusicOff => "Music off",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::TestHarness;

    fn app() -> App {
        App::new(TestHarness::new().session)
    }

    #[test]
    fn test_move_logs_nothing_on_open_ground() {
        let mut app = app();
        let before = app.log.len();
        app.move_player(Direction::Right);
        assert_eq!(app.log.len(), before);
        assert_eq!(
            app.session.state().player.position,
            rpg_core::Position::new(2, 1)
        );
    }

    #[test]
    fn test_battle_outside_battle_reports_error() {
        let mut app = app();
        app.battle(BattleAction::Attack);
        assert!(app.status().unwrap().starts_with("Error: Not in a battle"));
    }

    #[test]
    fn test_music_cue_sets_status() {
        let mut app = app();
        app.toggle_music();
        assert_eq!(app.status(), Some("♪ Music on"));
        app.toggle_music();
        assert_eq!(app.status(), Some("Music off"));
    }

    #[tokio::test]
    async fn test_load_without_save() {
        let mut app = app();
        app.pending_load = true;
        app.run_pending_io().await;
        assert!(!app.pending_load);
        assert_eq!(app.status(), Some("No save found."));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let mut app = app();
        app.pending_save = true;
        app.run_pending_io().await;
        assert_eq!(app.log.last().unwrap().text, "Game saved.");

        app.move_player(Direction::Down);
        app.pending_load = true;
        app.run_pending_io().await;
        assert_eq!(app.log.last().unwrap().text, "Save loaded.");
        assert_eq!(
            app.session.state().player.position,
            rpg_core::Position::new(1, 1)
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let mut app = app();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            app.add_log(format!("line {i}"), LogKind::Game);
        }
        assert_eq!(app.log.len(), MAX_LOG_ENTRIES);
        assert_eq!(app.log.last().unwrap().text, format!("line {}", MAX_LOG_ENTRIES + 9));
    }
}
