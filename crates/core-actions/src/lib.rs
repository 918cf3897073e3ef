//! Key translation, action dispatch and the editing session.
//!
//! Input flows `KeyEvent -> translate_key -> Action -> dispatch`. The
//! `EditSession` wraps that pipeline together with the snapshot store and
//! the version browser, and is the only type the runtime drives.

pub mod dispatcher;
pub mod io_ops;
mod key_translator;
pub mod session;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{KeyBindings, translate_key};
pub use session::{EditSession, Focus, SessionStep};

/// A single editor intent produced from one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ModeChange(ModeChange),
    Motion(MotionKind),
    Edit(EditKind),
    CommandChar(char),
    CommandBackspace,
    CommandCancel,
    /// Run the pending command text.
    CommandExecute(String),
    OpenHistory,
    /// Leave without saving.
    Quit,
}

impl Action {
    /// Payload-free name for logging (typed text never reaches the log).
    pub fn label(&self) -> &'static str {
        match self {
            Action::ModeChange(ModeChange::EnterInsert) => "enter_insert",
            Action::ModeChange(ModeChange::LeaveInsert) => "leave_insert",
            Action::Motion(_) => "motion",
            Action::Edit(kind) => kind.label(),
            Action::CommandChar(_) => "command_char",
            Action::CommandBackspace => "command_backspace",
            Action::CommandCancel => "command_cancel",
            Action::CommandExecute(_) => "command_execute",
            Action::OpenHistory => "open_history",
            Action::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnterInsert,
    LeaveInsert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    InsertNewline,
    Backspace,
}

impl EditKind {
    pub fn label(&self) -> &'static str {
        match self {
            EditKind::InsertChar(_) => "insert_char",
            EditKind::InsertNewline => "insert_newline",
            EditKind::Backspace => "backspace",
        }
    }
}
