//! Mode transition handling (Command <-> Insert).

use super::DispatchResult;
use crate::ModeChange;
use core_state::{EditorState, Mode};

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    match mc {
        ModeChange::EnterInsert => {
            state.set_mode(Mode::Insert);
            DispatchResult::dirty()
        }
        ModeChange::LeaveInsert => {
            state.command_line.clear();
            state.set_mode(Mode::Command);
            DispatchResult::dirty()
        }
    }
}
