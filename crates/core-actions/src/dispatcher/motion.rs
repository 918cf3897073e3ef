//! Motion sub-dispatch (cursor movement).
//!
//! Vertical moves keep the column where possible and clamp it to
//! `len(new line) + 1`. Horizontal moves stay within `[1, len + 1]`.
//! Nothing moves in an empty buffer.

use super::DispatchResult;
use crate::MotionKind;
use core_model::View;
use core_state::EditorState;

pub(crate) fn handle_motion(kind: MotionKind, state: &EditorState, view: &mut View) -> DispatchResult {
    let buffer = state.buffer();
    let before = view.cursor;
    let cursor = &mut view.cursor;
    match kind {
        MotionKind::Up => {
            if cursor.row > 0 {
                cursor.row -= 1;
                cursor.col = cursor.col.min(buffer.line_len(cursor.row) + 1);
            }
        }
        MotionKind::Down => {
            if cursor.row + 1 < buffer.line_count() {
                cursor.row += 1;
                cursor.col = cursor.col.min(buffer.line_len(cursor.row) + 1);
            }
        }
        MotionKind::Left => {
            if cursor.col > 1 {
                cursor.col -= 1;
            }
        }
        MotionKind::Right => {
            if !buffer.is_empty() && cursor.col <= buffer.line_len(cursor.row) {
                cursor.col += 1;
            }
        }
    }
    if before != view.cursor {
        tracing::trace!(target: "actions.dispatch", motion = ?kind, line = before.row, col = before.col, to_line = view.cursor.row, to_col = view.cursor.col, "motion");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Position};

    fn mk(text: &str, cursor: Position) -> (EditorState, View) {
        let st = EditorState::new(Buffer::from_text(text));
        let mut view = View::new(10);
        view.cursor = cursor;
        (st, view)
    }

    #[test]
    fn vertical_clamps_column() {
        let (st, mut v) = mk("long line\nab\nlonger again", Position::new(0, 9));
        handle_motion(MotionKind::Down, &st, &mut v);
        assert_eq!(v.cursor, Position::new(1, 3));
        handle_motion(MotionKind::Down, &st, &mut v);
        assert_eq!(v.cursor, Position::new(2, 3));
        let r = handle_motion(MotionKind::Down, &st, &mut v);
        assert!(!r.dirty);
        handle_motion(MotionKind::Up, &st, &mut v);
        handle_motion(MotionKind::Up, &st, &mut v);
        assert_eq!(v.cursor, Position::new(0, 3));
        assert!(!handle_motion(MotionKind::Up, &st, &mut v).dirty);
    }

    #[test]
    fn horizontal_bounds() {
        let (st, mut v) = mk("ab", Position::new(0, 1));
        assert!(!handle_motion(MotionKind::Left, &st, &mut v).dirty);
        handle_motion(MotionKind::Right, &st, &mut v);
        handle_motion(MotionKind::Right, &st, &mut v);
        assert_eq!(v.cursor.col, 3);
        assert!(!handle_motion(MotionKind::Right, &st, &mut v).dirty);
    }

    #[test]
    fn right_counts_graphemes() {
        let (st, mut v) = mk("e\u{301}x", Position::new(0, 1));
        handle_motion(MotionKind::Right, &st, &mut v);
        handle_motion(MotionKind::Right, &st, &mut v);
        assert_eq!(v.cursor.col, 3);
        assert!(!handle_motion(MotionKind::Right, &st, &mut v).dirty);
    }

    #[test]
    fn empty_buffer_is_inert() {
        let (st, mut v) = mk("", Position::origin());
        for k in [MotionKind::Up, MotionKind::Down, MotionKind::Left, MotionKind::Right] {
            assert!(!handle_motion(k, &st, &mut v).dirty);
        }
    }
}
