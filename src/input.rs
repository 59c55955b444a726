//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Keys that start background
//! work return the [`Job`] for the caller to hand to the worker.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a match arm in the handler for the tab it belongs to.
//! 3. Update the hint text in `draw_status_bar` in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Tab};
use crate::worker::Job;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Job> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.quit = true,
            KeyCode::Char('u') => app.clear_input(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => {
            app.quit = true;
            return None;
        }
        KeyCode::Tab => {
            app.next_tab();
            return None;
        }
        KeyCode::BackTab => {
            app.previous_tab();
            return None;
        }
        KeyCode::Char('q') if !app.tab().takes_text() => {
            app.quit = true;
            return None;
        }
        _ => {}
    }

    match app.tab() {
        Tab::Home => None,
        Tab::Feed => feed_key(app, key.code),
        Tab::Tool(_) => tool_key(app, key.code),
        Tab::Markets => markets_key(app, key.code),
    }
}

fn feed_key(app: &mut App, code: KeyCode) -> Option<Job> {
    match code {
        KeyCode::Char('r') | KeyCode::Enter => return app.submit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    None
}

fn tool_key(app: &mut App, code: KeyCode) -> Option<Job> {
    match code {
        KeyCode::Enter => return app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
    None
}

fn markets_key(app: &mut App, code: KeyCode) -> Option<Job> {
    match code {
        KeyCode::Enter => return app.submit(),
        KeyCode::Char('d') => app.cycle_range(),
        KeyCode::Char('a') => app.cycle_asset_class(),
        KeyCode::Char('g') => app.cycle_region(),
        _ => {}
    }
    None
}
