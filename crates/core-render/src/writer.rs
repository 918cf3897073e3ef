//! Terminal writer.
//!
//! Frames are translated into an ordered list of primitive commands and then
//! queued onto any `Write` in one pass with a single flush at the end.
//! Positions are absolute with a (0,0) origin; the frame guarantees bounds.

use crate::{CellFlags, Frame};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Reverse(bool),
    ShowCursor,
    HideCursor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn reverse(&mut self, on: bool) {
        self.cmds.push(Command::Reverse(on));
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Build the command list for a whole frame: each row is cleared and
    /// repainted, runs of reversed cells are bracketed by attribute changes,
    /// and the cursor is placed (or hidden) last.
    pub fn from_frame(frame: &Frame) -> Self {
        let mut w = Writer::new();
        w.cmds.push(Command::HideCursor);
        for y in 0..frame.height {
            w.move_to(0, y);
            w.clear_line();
            let mut run = String::new();
            let mut reversed = false;
            for (cluster, _w, flags, _x) in frame.row_leaders(y) {
                let rev = flags.contains(CellFlags::REVERSE);
                if rev != reversed {
                    w.print(std::mem::take(&mut run));
                    w.reverse(rev);
                    reversed = rev;
                }
                run.push_str(cluster);
            }
            let trimmed = if reversed { run.as_str() } else { run.trim_end() };
            w.print(trimmed);
            if reversed {
                w.reverse(false);
            }
        }
        if let Some((x, y)) = frame.cursor {
            w.move_to(x, y);
            w.cmds.push(Command::ShowCursor);
        }
        w
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Reverse(true) => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reverse(false) => queue!(out, SetAttribute(Attribute::Reset))?,
                Command::ShowCursor => queue!(out, Show)?,
                Command::HideCursor => queue!(out, Hide)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Emit `frame` to `out`.
pub fn draw<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    let writer = Writer::from_frame(frame);
    tracing::trace!(target: "render", commands = writer.commands().len(), cursor = frame.cursor.is_some(), "frame");
    writer.flush_to(out)
}
