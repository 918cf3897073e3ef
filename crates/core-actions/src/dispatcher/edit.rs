//! Text edit action handling (insert/backspace/newline).
//!
//! Edits apply only in Insert mode. Typing into an empty buffer first
//! creates one empty line. All column arithmetic is in grapheme clusters
//! through `core_text`.

use super::DispatchResult;
use crate::EditKind;
use core_model::View;
use core_state::{EditorState, Mode};

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState, view: &mut View) -> DispatchResult {
    if !matches!(state.mode, Mode::Insert) {
        return DispatchResult::clean();
    }
    let before = view.cursor;
    let changed = match kind {
        EditKind::InsertChar(ch) => {
            let buffer = state.buffer_mut();
            buffer.ensure_line();
            let ok = buffer.insert_char(view.cursor.row, view.cursor.col, ch);
            if ok {
                view.cursor.col += 1;
            }
            ok
        }
        EditKind::InsertNewline => {
            let buffer = state.buffer_mut();
            buffer.ensure_line();
            let ok = buffer.splice_at(view.cursor.row, view.cursor.col);
            if ok {
                view.cursor.row += 1;
                view.cursor.col = 1;
            }
            ok
        }
        EditKind::Backspace => backspace(state, view),
    };
    if !changed {
        return DispatchResult::clean();
    }
    state.dirty = true;
    tracing::trace!(target: "actions.dispatch", op = kind.label(), line = before.row, col = before.col, to_line = view.cursor.row, to_col = view.cursor.col, "edit");
    DispatchResult::dirty()
}

fn backspace(state: &mut EditorState, view: &mut View) -> bool {
    let row = view.cursor.row;
    if view.cursor.col > 1 {
        let ok = state.buffer_mut().delete_before(row, view.cursor.col);
        if ok {
            view.cursor.col -= 1;
        }
        return ok;
    }
    match state.buffer_mut().merge_up(row) {
        Some(join_col) => {
            view.cursor.row = row - 1;
            view.cursor.col = join_col;
            view.note_line_removed_above(row);
            true
        }
        None => false,
    }
}
