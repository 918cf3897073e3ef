//! Editor state: the single buffer, mode, pending command text, modified flag
//! and the status message.
//!
//! Cursor and scroll position live in `core-model::View`; this crate stays
//! buffer-centric. Status messages are not timed: a message set while handling
//! one key stays visible until the next key is handled, at which point the
//! session calls `clear_status`.

use core_text::Buffer;
use std::path::{Path, PathBuf};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys accumulate into the pending command text.
    #[default]
    Command,
    /// Keys edit the buffer at the cursor.
    Insert,
}

impl Mode {
    /// Cursor visibility tracks the mode.
    pub fn cursor_visible(self) -> bool {
        matches!(self, Mode::Insert)
    }
}

/// Pending command text typed in Command mode (e.g. `:wq`). Stored verbatim;
/// the leading `:` is whatever the user typed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Remove the last character; no-op when empty.
    pub fn backspace(&mut self) {
        self.buf.pop();
    }
}

/// Top-level editor state container.
#[derive(Debug, Default)]
pub struct EditorState {
    buffer: Buffer,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    pub dirty: bool,
    pub command_line: CommandLineState,
    status: Option<String>,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    pub fn with_file(buffer: Buffer, path: impl Into<PathBuf>) -> Self {
        Self {
            file_name: Some(path.into()),
            ..Self::new(buffer)
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Callers set `dirty` themselves after a successful mutation.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Swap in a freshly loaded buffer (open or restore). Clears the modified
    /// flag and any pending command text.
    pub fn replace_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.dirty = false;
        self.command_line.clear();
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::trace!(target: "state", from = ?self.mode, to = ?mode, "mode_change");
            self.mode = mode;
        }
    }

    /// Show a message in the status line until the next key.
    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = Some(msg.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns true if a message was cleared.
    pub fn clear_status(&mut self) -> bool {
        self.status.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_command_mode_clean() {
        let st = EditorState::new(Buffer::new());
        assert_eq!(st.mode, Mode::Command);
        assert!(!st.dirty);
        assert!(st.command_line.is_empty());
        assert!(!st.mode.cursor_visible());
    }

    #[test]
    fn command_line_push_backspace_clear() {
        let mut cl = CommandLineState::default();
        cl.push_char(':');
        cl.push_char('w');
        cl.push_char('x');
        cl.backspace();
        assert_eq!(cl.buffer(), ":w");
        cl.clear();
        assert!(cl.is_empty());
        cl.backspace();
        assert!(cl.is_empty());
    }

    #[test]
    fn replace_buffer_resets_dirty_and_pending() {
        let mut st = EditorState::with_file(Buffer::from_text("a\n"), "a.txt");
        st.dirty = true;
        st.command_line.push_char(':');
        st.replace_buffer(Buffer::from_text("b\n"));
        assert!(!st.dirty);
        assert!(st.command_line.is_empty());
        assert_eq!(st.buffer().line(0), Some("b"));
        assert_eq!(st.file_path(), Some(Path::new("a.txt")));
    }

    #[test]
    fn status_message_lives_until_cleared() {
        let mut st = EditorState::default();
        assert!(!st.clear_status());
        st.set_status("write failed");
        assert_eq!(st.status(), Some("write failed"));
        assert!(st.clear_status());
        assert_eq!(st.status(), None);
    }
}
