//! Status line composition.
//!
//! Format, left to right:
//! * ` -- INSERT -- ` in reverse video while in Insert mode.
//! * ` <pending>` in Command mode when command text is pending, shown exactly
//!   as typed (the `:` is part of what the user typed).
//! * ` *` when the buffer has unsaved changes.
//! * ` <message>` when a status message is set.
//!
//! Two stages, as for the rest of the frame: `compose_status` produces ordered
//! segments and `paint` (or `format_status`) turns them into cells or text.

use crate::{CellFlags, Frame};
use core_state::{EditorState, Mode};

pub const INSERT_LABEL: &str = " -- INSERT -- ";

pub struct StatusContext<'a> {
    pub mode: Mode,
    pub pending: &'a str,
    pub dirty: bool,
    pub message: Option<&'a str>,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState) -> Self {
        Self {
            mode: state.mode,
            pending: state.command_line.buffer(),
            dirty: state.dirty,
            message: state.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    InsertLabel,
    Pending(&'a str),
    Modified,
    Message(&'a str),
}

impl StatusSegment<'_> {
    fn text(&self) -> String {
        match self {
            StatusSegment::InsertLabel => INSERT_LABEL.to_string(),
            StatusSegment::Pending(p) => format!(" {p}"),
            StatusSegment::Modified => " *".to_string(),
            StatusSegment::Message(m) => format!(" {m}"),
        }
    }

    fn flags(&self) -> CellFlags {
        match self {
            StatusSegment::InsertLabel => CellFlags::REVERSE,
            _ => CellFlags::empty(),
        }
    }
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(4);
    match ctx.mode {
        Mode::Insert => out.push(StatusSegment::InsertLabel),
        Mode::Command if !ctx.pending.is_empty() => out.push(StatusSegment::Pending(ctx.pending)),
        Mode::Command => {}
    }
    if ctx.dirty {
        out.push(StatusSegment::Modified);
    }
    if let Some(msg) = ctx.message {
        out.push(StatusSegment::Message(msg));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    segments.iter().map(StatusSegment::text).collect()
}

/// Paint the status line into row `y` of `frame`.
pub fn paint(frame: &mut Frame, y: u16, ctx: &StatusContext<'_>) {
    let mut x = 0;
    for seg in compose_status(ctx) {
        x = frame.put_str(x, y, &seg.text(), seg.flags());
    }
}
