//! Frame composition and terminal emission.
//!
//! Every repaint builds a full `Frame` (a grid of grapheme-cluster cells) from
//! the current model and then emits it row by row through `writer`. There is
//! no partial repaint: the screen is small and a full frame per key is cheap.
//!
//! Cell invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty, directly after its leader.
//! - Emission prints leader clusters only, each exactly once.
//!
//! Screen layout while editing:
//! - Rows `0..rows-1`: buffer lines from `top_row`, each drawn as `~` followed
//!   by the line text, so buffer column N sits in screen column N.
//! - Last column: a one-cell scrollbar when the buffer is taller than the
//!   text area.
//! - Last row: the status line (see `status`).
//!
//! The version browser replaces the whole screen while it has focus.

use bitflags::bitflags;
use core_history::{EMPTY_MESSAGE, TITLE, VersionBrowser};
use core_model::EditorModel;
use core_text::grapheme;

pub mod status;
pub mod writer;

pub use writer::draw;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full grapheme cluster (leader cells only). Empty for continuation cells.
    pub cluster: String,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.clamp(1, u16::from(u8::MAX)) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    /// Where the terminal cursor goes after emission; `None` hides it.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Set a full cluster at (x,y) and populate continuation cells for its width.
    /// A cluster that would straddle the right edge is not drawn.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        let width = width.max(1);
        if y >= self.height || x.saturating_add(width) > self.width {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, width, flags);
        }
        for dx in 1..width {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
    }

    /// Write `text` starting at (x,y), clipped to the frame. Returns the column
    /// after the last cluster written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, flags: CellFlags) -> u16 {
        let mut col = x;
        for g in grapheme::iter(text) {
            if col >= self.width {
                break;
            }
            let (shown, width) = displayable(g);
            self.set_cluster(col, y, shown, width, flags);
            col = col.saturating_add(width);
        }
        col.min(self.width)
    }

    /// Iterate leader cells of a row, yielding (cluster, width, flags, start_x).
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let width = self.width;
        let start = usize::from(y) * usize::from(width);
        let mut x = 0u16;
        std::iter::from_fn(move || {
            if y >= self.height {
                return None;
            }
            while x < width {
                let cell = &self.cells[start + usize::from(x)];
                if cell.is_leader() {
                    let w = u16::from(cell.width);
                    let out = (cell.cluster.as_str(), w, cell.flags, x);
                    x = x.saturating_add(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Row text with trailing blanks removed.
    pub fn row_text(&self, y: u16) -> String {
        let text: String = self.row_leaders(y).map(|(c, _, _, _)| c).collect();
        text.trim_end().to_string()
    }

    pub fn flags_at(&self, x: u16, y: u16) -> CellFlags {
        self.index(x, y)
            .map(|i| self.cells[i].flags)
            .unwrap_or(CellFlags::empty())
    }
}

/// Control characters (tab included) would move the terminal cursor; they
/// are drawn as a single visible placeholder cell instead.
fn displayable(g: &str) -> (&str, u16) {
    if g.chars().any(char::is_control) {
        let shown = if g == "\t" { " " } else { "?" };
        return (shown, 1);
    }
    let width = u16::try_from(grapheme::cluster_width(g)).unwrap_or(1);
    (g, width)
}

/// Cell the scrollbar thumb occupies, or `None` when everything fits.
pub fn scrollbar_thumb(total_lines: usize, text_rows: usize, top_row: usize) -> Option<usize> {
    let visible = total_lines.min(text_rows);
    if visible == 0 || total_lines <= visible {
        return None;
    }
    Some((top_row * visible / total_lines).min(visible - 1))
}

/// Compose the editing screen for a terminal of `cols` x `rows`.
pub fn compose_editor(model: &EditorModel, cols: u16, rows: u16) -> Frame {
    let mut frame = Frame::new(cols, rows);
    if rows == 0 || cols == 0 {
        return frame;
    }
    let state = model.state();
    let view = model.view();
    let buffer = state.buffer();
    let text_rows = rows - 1;

    for (screen_y, row) in view.visible_rows().enumerate() {
        let Ok(y) = u16::try_from(screen_y) else { break };
        if y >= text_rows {
            break;
        }
        let Some(line) = buffer.line(row) else { break };
        let x = frame.put_str(0, y, "~", CellFlags::empty());
        frame.put_str(x, y, line, CellFlags::empty());
    }

    if let Some(thumb) = scrollbar_thumb(buffer.line_count(), usize::from(text_rows), view.top_row) {
        let visible = buffer.line_count().min(usize::from(text_rows));
        let x = cols - 1;
        for i in 0..visible {
            let y = i as u16;
            let flags = if i == thumb {
                CellFlags::REVERSE
            } else {
                CellFlags::empty()
            };
            frame.set_cluster(x, y, " ", 1, flags);
        }
    }

    status::paint(&mut frame, rows - 1, &status::StatusContext::from_state(state));

    if state.mode.cursor_visible() {
        let line = buffer.line(view.cursor.row).unwrap_or_default();
        let x = 1 + grapheme::visual_col(line, view.cursor.col);
        let x = u16::try_from(x).unwrap_or(u16::MAX).min(cols - 1);
        let y = u16::try_from(view.cursor_screen_row()).unwrap_or(0).min(text_rows.saturating_sub(1));
        frame.cursor = Some((x, y));
    }
    frame
}

/// Left edge of the centered browser column.
fn browser_left(cols: u16) -> u16 {
    cols.saturating_sub(20) / 2
}

/// Compose the version browser screen.
pub fn compose_browser(browser: &VersionBrowser, cols: u16, rows: u16) -> Frame {
    let mut frame = Frame::new(cols, rows);
    if rows == 0 || cols == 0 {
        return frame;
    }
    let left = browser_left(cols);
    if browser.is_empty() {
        frame.put_str(left, rows / 2, EMPTY_MESSAGE, CellFlags::empty());
        return frame;
    }

    frame.put_str(left, 0, TITLE, CellFlags::empty());
    let list_rows = usize::from(rows.saturating_sub(2)).max(1);
    let first = browser.selected().saturating_sub(list_rows - 1);
    for (i, stamp) in browser.versions().iter().enumerate().skip(first).take(list_rows) {
        let y = (i - first + 2) as u16;
        let flags = if i == browser.selected() {
            CellFlags::REVERSE
        } else {
            CellFlags::empty()
        };
        frame.put_str(left, y, stamp.as_str(), flags);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EditorModel;
    use core_state::{EditorState, Mode};
    use core_text::{Buffer, Position};
    use core_versions::VersionStamp;

    fn model(text: &str, height: usize) -> EditorModel {
        EditorModel::new(EditorState::new(Buffer::from_text(text)), height)
    }

    #[test]
    fn text_rows_are_tilde_prefixed() {
        let m = model("hello\nworld", 3);
        let f = compose_editor(&m, 20, 4);
        assert_eq!(f.row_text(0), "~hello");
        assert_eq!(f.row_text(1), "~world");
        assert_eq!(f.row_text(2), "");
    }

    #[test]
    fn rows_start_at_top_row() {
        let mut m = model("a\nb\nc\nd", 2);
        m.view_mut().cursor = Position::new(2, 1);
        m.view_mut().top_row = 1;
        let f = compose_editor(&m, 10, 3);
        assert_eq!(f.row_text(0), "~b");
        assert_eq!(f.row_text(1), "~c");
    }

    #[test]
    fn tabs_and_controls_take_one_cell() {
        let m = model("a\tb\u{1}c", 1);
        let f = compose_editor(&m, 20, 2);
        assert_eq!(f.row_text(0), "~a b?c");
    }

    #[test]
    fn wide_clusters_use_continuations() {
        let m = model("日本", 1);
        let f = compose_editor(&m, 10, 2);
        let leaders: Vec<_> = f.row_leaders(0).map(|(c, w, _, x)| (c.to_string(), w, x)).collect();
        assert_eq!(leaders[1], ("日".to_string(), 2, 1));
        assert_eq!(leaders[2], ("本".to_string(), 2, 3));
    }

    #[test]
    fn scrollbar_only_when_buffer_overflows() {
        let m = model("a\nb", 3);
        let f = compose_editor(&m, 10, 4);
        assert!(!f.flags_at(9, 0).contains(CellFlags::REVERSE));

        let body: String = (0..10).map(|i| format!("{i}\n")).collect();
        let mut m = model(&body, 3);
        m.view_mut().top_row = 5;
        m.view_mut().cursor = Position::new(5, 1);
        let f = compose_editor(&m, 10, 4);
        assert_eq!(scrollbar_thumb(10, 3, 5), Some(1));
        assert!(f.flags_at(9, 1).contains(CellFlags::REVERSE));
        assert!(!f.flags_at(9, 0).contains(CellFlags::REVERSE));
    }

    #[test]
    fn cursor_hidden_in_command_mode() {
        let m = model("abc", 2);
        assert_eq!(compose_editor(&m, 10, 3).cursor, None);
    }

    #[test]
    fn cursor_column_accounts_for_prefix_and_width() {
        let mut m = model("日x", 2);
        m.state_mut().set_mode(Mode::Insert);
        m.view_mut().cursor = Position::new(0, 2);
        assert_eq!(compose_editor(&m, 10, 3).cursor, Some((3, 0)));
        m.view_mut().cursor = Position::new(0, 1);
        assert_eq!(compose_editor(&m, 10, 3).cursor, Some((1, 0)));
    }

    #[test]
    fn browser_lists_newest_first_with_selection() {
        let stamps: Vec<VersionStamp> = ["20240102000000", "20240101000000"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut b = VersionBrowser::with_versions("f.txt", stamps);
        b.move_down();
        let f = compose_browser(&b, 40, 10);
        assert_eq!(f.row_text(0).trim_start(), TITLE);
        assert_eq!(f.row_text(2).trim_start(), "20240102000000");
        assert_eq!(f.row_text(3).trim_start(), "20240101000000");
        assert!(f.flags_at(10, 3).contains(CellFlags::REVERSE));
        assert!(!f.flags_at(10, 2).contains(CellFlags::REVERSE));
    }

    #[test]
    fn browser_empty_notice_is_centered() {
        let b = VersionBrowser::with_versions("f.txt", Vec::new());
        let f = compose_browser(&b, 40, 10);
        assert_eq!(f.row_text(5), format!("{}{}", " ".repeat(10), EMPTY_MESSAGE));
    }

    #[test]
    fn browser_scrolls_to_keep_selection_visible() {
        let stamps: Vec<VersionStamp> = (0..10)
            .map(|i| format!("202401010000{i:02}").parse().unwrap())
            .collect();
        let mut b = VersionBrowser::with_versions("f.txt", stamps);
        for _ in 0..6 {
            b.move_down();
        }
        let f = compose_browser(&b, 40, 5);
        assert_eq!(f.row_text(4).trim_start(), "20240101000006");
        assert!(f.flags_at(10, 4).contains(CellFlags::REVERSE));
    }
}
