//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, Mode};
use crate::rank::SortBy;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Send SIGTERM to the confirmed target.
    Kill { pid: u32 },
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match &state.mode {
        Mode::Normal => handle_normal_mode(state, key),
        Mode::Search { .. } => handle_search_mode(state, key),
        Mode::ConfirmKill { .. } => handle_confirm_kill(state, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Row navigation
        KeyCode::Up => {
            state.select_up();
            KeyAction::None
        }
        KeyCode::Down => {
            state.select_down();
            KeyAction::None
        }

        // Sort keys
        KeyCode::Char('p') => {
            state.set_sort(SortBy::Pid);
            KeyAction::None
        }
        KeyCode::Char('n') => {
            state.set_sort(SortBy::Name);
            KeyAction::None
        }
        KeyCode::Char('m') => {
            state.set_sort(SortBy::Memory);
            KeyAction::None
        }
        KeyCode::Char('c') => {
            state.set_sort(SortBy::Cpu);
            KeyAction::None
        }

        // Search
        KeyCode::Char('/') => {
            state.enter_search();
            KeyAction::None
        }
        KeyCode::Esc => {
            state.filter_text.clear();
            state.rebuild_visible();
            KeyAction::None
        }

        // Kill (selection required; no-op on an empty view)
        KeyCode::Char('k') | KeyCode::F(9) => {
            state.enter_confirm_kill();
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

/// Handles keys while editing the search buffer. Every edit is applied
/// to the view immediately.
fn handle_search_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            state.leave_search();
        }
        KeyCode::Backspace => {
            state.pop_filter_char();
            state.rebuild_visible();
        }
        KeyCode::Char(c) if is_filter_char(c) && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.push_filter_char(c);
            state.rebuild_visible();
        }
        _ => {}
    }
    KeyAction::None
}

fn is_filter_char(c: char) -> bool {
    c.is_ascii_graphic() || c == ' '
}

/// Handles the kill confirmation dialog. Only an explicit `y` fires the
/// signal; any other decision key (or nothing) cancels.
fn handle_confirm_kill(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let Mode::ConfirmKill { pid, .. } = std::mem::replace(&mut state.mode, Mode::Normal)
            else {
                return KeyAction::None;
            };
            state.quick_refresh = true;
            KeyAction::Kill { pid }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::None
        }
        // Anything else is discarded while the dialog is open.
        _ => KeyAction::None,
    }
}
