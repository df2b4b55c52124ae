//! Event handling for the tile RPG TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rpg_core::{BattleAction, Direction};

use crate::app::App;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Any key closes the help overlay
    if app.show_help {
        app.show_help = false;
        return EventResult::NeedsRedraw;
    }

    // Global hotkeys
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return EventResult::Quit,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('s') => {
            app.pending_save = true;
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('l') => {
            app.pending_load = true;
            return EventResult::NeedsRedraw;
        }
        KeyCode::Char('m') => {
            app.toggle_music();
            return EventResult::NeedsRedraw;
        }
        _ => {}
    }

    let mode = app.session.mode();
    if mode.in_battle() {
        handle_battle_keys(app, key)
    } else if mode.in_dialogue() {
        handle_dialogue_keys(app, key)
    } else {
        handle_exploration_keys(app, key)
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Arrow keys move
fn handle_exploration_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match direction_for(key.code) {
        Some(direction) => {
            app.move_player(direction);
            EventResult::NeedsRedraw
        }
        None => EventResult::Continue,
    }
}

/// Number keys pick an option; arrow keys walk away
fn handle_dialogue_keys(app: &mut App, key: KeyEvent) -> EventResult {
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        let index = (c as usize) - ('1' as usize);
        app.choose(index);
        return EventResult::NeedsRedraw;
    }
    handle_exploration_keys(app, key)
}

fn handle_battle_keys(app: &mut App, key: KeyEvent) -> EventResult {
    let action = match key.code {
        KeyCode::Char('a') => BattleAction::Attack,
        KeyCode::Char('d') => BattleAction::Defend,
        KeyCode::Char('r') => BattleAction::Run,
        _ => return EventResult::Continue,
    };
    app.battle(action);
    EventResult::NeedsRedraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{Position, TestHarness};

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_arrow_keys_move() {
        let mut app = App::new(TestHarness::new().session);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.state().player.position, Position::new(2, 2));
    }

    #[test]
    fn test_arrow_up_into_wall() {
        let mut app = App::new(TestHarness::new().session);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.state().player.position, Position::new(1, 1));
    }

    #[test]
    fn test_dialogue_number_keys() {
        let mut harness = TestHarness::new();
        harness.teleport(Position::new(2, 3));
        let mut app = App::new(harness.session);

        press(&mut app, KeyCode::Right);
        assert!(app.session.mode().in_dialogue());

        press(&mut app, KeyCode::Char('3'));
        assert!(app.session.mode().is_exploring());
        assert_eq!(app.log.last().unwrap().text, "Dialogue ended.");
    }

    #[test]
    fn test_battle_keys() {
        let mut harness = TestHarness::new();
        harness.engage("g1");
        let mut app = App::new(harness.session);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.session.state().player.hp < 100);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.state().player.position, Position::new(1, 1));
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = App::new(TestHarness::new().session);
        assert_eq!(press(&mut app, KeyCode::Char('?')), EventResult::NeedsRedraw);
        assert!(app.show_help);
        // The first key only closes help
        assert_eq!(press(&mut app, KeyCode::Char('q')), EventResult::NeedsRedraw);
        assert_eq!(press(&mut app, KeyCode::Char('q')), EventResult::Quit);
    }

    #[test]
    fn test_save_key_queues_io() {
        let mut app = App::new(TestHarness::new().session);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.pending_save);
    }
}
