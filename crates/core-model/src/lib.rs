//! Editor model: the state plus the single view onto it.
//!
//! A `View` owns presentation state (cursor and `top_row`) so buffer editing
//! semantics stay in `core-state`/`core-text`.
//!
//! Invariants (hold after every public call that moves the cursor):
//! * `top_row <= cursor.row <= top_row + height - 1`.
//! * A single cursor move changes `top_row` by at most one row. Only
//!   `set_height` (terminal resize) and `reset` may jump further.
//! * `height >= 1`.

use core_state::EditorState;
use core_text::Position;

/// Compute the next `top_row` that brings `cursor_row` one step closer to the
/// visible band `[top, top + height)`.
///
/// Returns `None` when the cursor is already visible. The shift is always
/// exactly one row; callers moving the cursor by a single row rely on that to
/// produce smooth scrolling.
pub fn compute_scroll_step(top: usize, cursor_row: usize, height: usize) -> Option<usize> {
    if height == 0 {
        return None;
    }
    if cursor_row < top {
        Some(top - 1)
    } else if cursor_row >= top + height {
        Some(top + 1)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub cursor: Position,
    pub top_row: usize,
    height: usize,
}

impl View {
    pub fn new(height: usize) -> Self {
        Self {
            cursor: Position::origin(),
            top_row: 0,
            height: height.max(1),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cursor to (0, 1), scroll to the top. Used after load and restore.
    pub fn reset(&mut self) {
        self.cursor = Position::origin();
        self.top_row = 0;
    }

    /// Shift `top_row` by one toward the cursor if it left the visible band.
    /// Returns true if the viewport moved.
    pub fn scroll_to_cursor(&mut self) -> bool {
        match compute_scroll_step(self.top_row, self.cursor.row, self.height) {
            Some(next) => {
                tracing::trace!(target: "model.view", from = self.top_row, to = next, row = self.cursor.row, "scroll");
                self.top_row = next;
                true
            }
            None => false,
        }
    }

    /// A line at `row` was removed from the buffer. Lines above the viewport
    /// pull the viewport up with them.
    pub fn note_line_removed_above(&mut self, row: usize) {
        if row < self.top_row {
            self.top_row -= 1;
        }
    }

    /// Resize: adopt the new text height and apply the minimal shift that
    /// keeps the cursor visible.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        if self.cursor.row < self.top_row {
            self.top_row = self.cursor.row;
        } else if self.cursor.row >= self.top_row + self.height {
            self.top_row = self.cursor.row + 1 - self.height;
        }
    }

    /// Buffer rows currently on screen (may extend past the buffer end).
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        self.top_row..self.top_row + self.height
    }

    pub fn cursor_in_view(&self) -> bool {
        self.visible_rows().contains(&self.cursor.row)
    }

    /// Screen row of the cursor relative to the top of the text area.
    pub fn cursor_screen_row(&self) -> usize {
        self.cursor.row.saturating_sub(self.top_row)
    }
}

/// State plus its view.
#[derive(Debug)]
pub struct EditorModel {
    state: EditorState,
    view: View,
}

impl EditorModel {
    pub fn new(state: EditorState, height: usize) -> Self {
        Self {
            state,
            view: View::new(height),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Disjoint mutable borrows of the state and the view.
    pub fn split_state_and_view(&mut self) -> (&mut EditorState, &mut View) {
        (&mut self.state, &mut self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    #[test]
    fn scroll_step_noop_inside_band() {
        assert_eq!(compute_scroll_step(0, 0, 5), None);
        assert_eq!(compute_scroll_step(3, 7, 5), None);
    }

    #[test]
    fn scroll_step_moves_one_row() {
        assert_eq!(compute_scroll_step(0, 5, 5), Some(1));
        assert_eq!(compute_scroll_step(4, 3, 5), Some(3));
        // Far away cursor still only yields a single step.
        assert_eq!(compute_scroll_step(0, 40, 5), Some(1));
    }

    #[test]
    fn moving_down_past_bottom_scrolls_once() {
        let mut v = View::new(3);
        for row in 1..=5 {
            v.cursor.row = row;
            v.scroll_to_cursor();
            assert!(v.cursor_in_view(), "row {row} visible");
        }
        assert_eq!(v.top_row, 3);
        v.cursor.row = 2;
        assert!(v.scroll_to_cursor());
        assert_eq!(v.top_row, 2);
    }

    #[test]
    fn line_removed_above_pulls_viewport_up() {
        let mut v = View::new(3);
        v.top_row = 4;
        v.cursor.row = 5;
        v.note_line_removed_above(5);
        assert_eq!(v.top_row, 4);
        v.note_line_removed_above(1);
        assert_eq!(v.top_row, 3);
    }

    #[test]
    fn resize_reclamps_minimally() {
        let mut v = View::new(10);
        v.cursor.row = 8;
        v.set_height(4);
        assert_eq!(v.top_row, 5);
        assert!(v.cursor_in_view());
        v.set_height(20);
        assert_eq!(v.top_row, 5);
        v.set_height(0);
        assert_eq!(v.height(), 1);
        assert_eq!(v.top_row, 8);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut v = View::new(2);
        v.cursor = Position::new(9, 4);
        v.top_row = 8;
        v.reset();
        assert_eq!(v.cursor, Position::origin());
        assert_eq!(v.top_row, 0);
    }

    #[test]
    fn split_borrows_are_disjoint() {
        let st = EditorState::new(Buffer::from_text("abc\n"));
        let mut model = EditorModel::new(st, 5);
        let (state, view) = model.split_state_and_view();
        state.dirty = true;
        view.cursor.col = 3;
        assert!(model.state().dirty);
        assert_eq!(model.view().cursor.col, 3);
        assert_eq!(model.view().cursor_screen_row(), 0);
    }
}
