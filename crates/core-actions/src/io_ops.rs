//! File IO helpers used by the session and command execution.
//!
//! Synchronous and minimal. Loading never fails hard: a missing file is an
//! empty buffer, and other read errors are handed back so the caller can
//! show them while still editing an empty buffer.

use core_state::EditorState;
use core_text::{Buffer, LineEnding};
use std::borrow::Cow;
use std::io;
use std::path::Path;

/// Result of attempting to read a file into a buffer.
#[derive(Debug)]
pub enum OpenFileResult {
    /// `lossy` is set when the bytes were not valid UTF-8 and invalid
    /// sequences were replaced with U+FFFD.
    Loaded { buffer: Buffer, lossy: bool },
    /// No file at the path yet; editing starts empty.
    Missing,
    Error(io::Error),
}

impl OpenFileResult {
    /// The buffer to edit, whatever the outcome.
    pub fn into_buffer(self) -> Buffer {
        match self {
            OpenFileResult::Loaded { buffer, .. } => buffer,
            OpenFileResult::Missing | OpenFileResult::Error(_) => Buffer::new(),
        }
    }
}

pub fn open_file(path: &Path) -> OpenFileResult {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lossy = matches!(text, Cow::Owned(_));
            let buffer = Buffer::from_text(&text);
            tracing::debug!(
                target: "io",
                path = %path.display(),
                lines = buffer.line_count(),
                crlf = buffer.line_ending() == LineEnding::CrLf,
                lossy,
                "file_loaded"
            );
            OpenFileResult::Loaded { buffer, lossy }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "file_missing");
            OpenFileResult::Missing
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, path = %path.display(), "file_open_error");
            OpenFileResult::Error(e)
        }
    }
}

/// Result of a write attempt.
#[derive(Debug)]
pub enum WriteFileResult {
    Success,
    Error(io::Error),
}

/// Write every buffer line followed by its line ending to `path`. Clears the modified
/// flag on success.
pub fn write_file(state: &mut EditorState, path: &Path) -> WriteFileResult {
    let content = state.buffer().content();
    match std::fs::write(path, content.as_bytes()) {
        Ok(()) => {
            state.dirty = false;
            tracing::debug!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
            WriteFileResult::Success
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, path = %path.display(), "file_write_error");
            WriteFileResult::Error(e)
        }
    }
}
