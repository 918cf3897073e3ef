//! Stateless key -> Action translation.
//!
//! Command mode:
//! * `i` enters Insert (never appended to the pending command text).
//! * Enter executes the pending text; Backspace pops one character; Esc
//!   clears it.
//! * Any other printable key is appended.
//!
//! Insert mode:
//! * Esc leaves Insert; arrows move; Enter splits; Backspace deletes or
//!   joins; printable keys insert.
//!
//! In either mode the configured history key opens the version browser and
//! Ctrl-C quits without saving. Those two are checked before mode handling.

use crate::{Action, EditKind, ModeChange, MotionKind};
use core_config::Config;
use core_events::{KeyCode, KeyEvent};
use core_state::Mode;

const QUIT_KEY: KeyEvent = KeyEvent::ctrl('c');

/// Keys whose meaning comes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub history: KeyEvent,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            history: KeyEvent::ctrl('h'),
        }
    }
}

impl From<&Config> for KeyBindings {
    fn from(cfg: &Config) -> Self {
        Self {
            history: cfg.history_key,
        }
    }
}

pub fn translate_key(
    mode: Mode,
    pending_command: &str,
    key: &KeyEvent,
    bindings: &KeyBindings,
) -> Option<Action> {
    if bindings.history.matches(key) {
        return Some(Action::OpenHistory);
    }
    if QUIT_KEY.matches(key) {
        return Some(Action::Quit);
    }
    match mode {
        Mode::Command => translate_command(pending_command, key),
        Mode::Insert => translate_insert(key),
    }
}

fn translate_command(pending_command: &str, key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::CommandExecute(pending_command.to_string())),
        KeyCode::Backspace => Some(Action::CommandBackspace),
        KeyCode::Esc => Some(Action::CommandCancel),
        _ => match key.printable()? {
            'i' => Some(Action::ModeChange(ModeChange::EnterInsert)),
            c => Some(Action::CommandChar(c)),
        },
    }
}

fn translate_insert(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::ModeChange(ModeChange::LeaveInsert)),
        KeyCode::Enter => Some(Action::Edit(EditKind::InsertNewline)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Up => Some(Action::Motion(MotionKind::Up)),
        KeyCode::Down => Some(Action::Motion(MotionKind::Down)),
        KeyCode::Left => Some(Action::Motion(MotionKind::Left)),
        KeyCode::Right => Some(Action::Motion(MotionKind::Right)),
        _ => key.printable().map(|c| Action::Edit(EditKind::InsertChar(c))),
    }
}
