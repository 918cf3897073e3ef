//! Dispatcher applying `Action` to mutable editor state.
//!
//! Sub-modules:
//! * `motion`  - cursor movement in Insert mode
//! * `mode`    - Command <-> Insert transitions
//! * `command` - pending command text and `:wq` / `:q` execution
//! * `edit`    - text mutation (insert/backspace/newline)
//!
//! After every action the view scrolls at most one row toward the cursor.

use crate::Action;
use core_model::EditorModel;
use core_versions::SnapshotStore;

mod command;
mod command_parser;
mod edit;
mod mode;
mod motion;

pub use command_parser::{CommandParser, ParsedCommand};

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// A repaint is needed.
    pub dirty: bool,
    pub quit: bool,
    /// The version browser should take focus.
    pub open_history: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            open_history: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            ..Self::dirty()
        }
    }
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::dirty()
        }
    }
    pub fn open_history() -> Self {
        Self {
            open_history: true,
            ..Self::dirty()
        }
    }
}

/// Apply an action to editor state.
pub fn dispatch(action: Action, model: &mut EditorModel, store: &SnapshotStore) -> DispatchResult {
    let (state, view) = model.split_state_and_view();
    tracing::trace!(target: "actions.dispatch", action = action.label(), mode = ?state.mode, "dispatch");

    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state, view),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state, view),
        Action::CommandChar(_)
        | Action::CommandBackspace
        | Action::CommandCancel
        | Action::CommandExecute(_) => command::handle_command_action(action, state, store),
        Action::OpenHistory => DispatchResult::open_history(),
        Action::Quit => {
            tracing::info!(target: "actions.dispatch", dirty = state.dirty, "quit_without_save");
            DispatchResult::quit()
        }
    };
    view.scroll_to_cursor();
    result
}
