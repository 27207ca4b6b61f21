//! Keyboard and mouse handling.
//!
//! Navigation acts on `App` directly; everything that mutates session state
//! goes through the operator-event queue and takes effect on the next
//! reducer pass, which the main loop runs right after input.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use crate::app::{App, InputField};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If a numeric prompt is open, it captures input
    if app.input.is_some() {
        handle_prompt_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Day stepping
        KeyCode::Left | KeyCode::Char('[') => app.step_day(-1),
        KeyCode::Right | KeyCode::Char(']') => app.step_day(1),

        // Chart toggle for the cursor node
        KeyCode::Enter | KeyCode::Char('g') => app.toggle_expand_cursor(),

        // Show/hide the cursor node
        KeyCode::Char(' ') => app.toggle_select_cursor(),

        // Remove the cursor node
        KeyCode::Char('d') => app.remove_cursor(),

        // Desired count
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_count(1),
        KeyCode::Char('-') => app.adjust_count(-1),
        KeyCode::Char('n') => app.start_input(InputField::NodeCount),

        // Thresholds for the cursor node
        KeyCode::Char('h') => app.start_input(InputField::High),
        KeyCode::Char('o') => app.start_input(InputField::Over),

        // Reload
        KeyCode::Char('r') => app.refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while a numeric prompt is open
fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_pop(),
        KeyCode::Char(c) => app.input_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::source::ChannelSource;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), DashboardConfig::default());
        app.apply_pending();
        app
    }

    #[test]
    fn test_quit_key() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.cursor, 1);
        handle_key_event(&mut app, key(KeyCode::Up));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_prompt_captures_digits() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        assert!(app.input.is_some());

        handle_key_event(&mut app, key(KeyCode::Char('5')));
        handle_key_event(&mut app, key(KeyCode::Char('q'))); // not a digit, ignored
        assert_eq!(app.input.as_ref().unwrap().buffer, "5");
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.input.is_none());
        app.apply_pending();
        assert_eq!(app.state.desired_count, 5);
    }

    #[test]
    fn test_prompt_escape_cancels() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('h')));
        handle_key_event(&mut app, key(KeyCode::Char('9')));
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.input.is_none());
        app.apply_pending();
        // Threshold unchanged.
        let id = app.cursor_node().unwrap();
        assert_eq!(app.state.thresholds.get(id).unwrap().high, 60.0);
    }
}
