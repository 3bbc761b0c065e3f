//! Event handling for the TUI

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;
use super::footer::LOAD_MORE_KEY;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Handle all input events
pub fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_TIMEOUT)? {
        match event::read()? {
            Event::Key(key) => handle_key_event(app, key, Instant::now()),
            Event::Resize(_, _) => {} // Terminal will redraw automatically
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Clear status message on any key press
    app.clear_status();

    // Scoped bindings win over global keys
    if app.dispatch_list_key(&key, now) {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Left | KeyCode::Backspace => app.go_up(),
        KeyCode::Char(c) if c == LOAD_MORE_KEY => app.load_more(),
        KeyCode::Char('t') => app.cycle_theme(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeasuresConfig;
    use crate::source::tests::{query, source};

    fn app() -> App {
        App::new(
            Box::new(source()),
            query("acme:app", 10),
            "coverage",
            &MeasuresConfig::default(),
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            press(&mut app, code);
            assert!(!app.running);
        }

        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(!app.running);
    }

    #[test]
    fn test_arrows_go_to_list_scope() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.browser.selected_key.as_deref(), Some("acme:app:src"));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.browser.root.key, "acme:app:src");

        press(&mut app, KeyCode::Left);
        assert_eq!(app.browser.root.key, "acme:app");
        assert_eq!(app.browser.selected_key.as_deref(), Some("acme:app:src"));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key, Instant::now());
        assert!(app.running);
    }

    #[test]
    fn test_key_clears_status() {
        let mut app = app();
        app.set_status("hello", false);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_theme_and_load_more_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.status_message.is_some());

        press(&mut app, KeyCode::Char(LOAD_MORE_KEY));
        assert_eq!(
            app.status_message.as_ref().map(|s| s.text.as_str()),
            Some("All components shown")
        );
    }

    #[test]
    fn test_unbound_after_shutdown() {
        let mut app = app();
        app.shutdown();
        press(&mut app, KeyCode::Down);
        assert!(app.browser.selected_key.is_none());
    }
}
