//! Input sources for the runtime loop.
//!
//! The loop is single-threaded and pulls one event at a time. `CrosstermInput`
//! blocks on the terminal; `ScriptedInput` replays a fixed list and is what
//! the runtime tests drive the session with.

use anyhow::Context;
use core_events::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods,
};
use std::collections::VecDeque;
use tracing::trace;

/// A blocking supplier of editor events. `Ok(None)` means no more input will
/// ever arrive.
pub trait InputSource {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>>;
}

/// Reads the real terminal. Events the editor has no use for (mouse, focus,
/// key releases, paste) are skipped rather than surfaced.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermInput {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        loop {
            let raw = crossterm::event::read().context("reading terminal event")?;
            if let Some(ev) = map_event(&raw) {
                return Ok(Some(ev));
            }
        }
    }
}

/// Replays queued events, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Event>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }
}

pub fn map_event(raw: &CEvent) -> Option<Event> {
    match raw {
        CEvent::Key(key) => map_key_event(key).map(Event::Key),
        CEvent::Resize(cols, rows) => Some(Event::Resize(*cols, *rows)),
        other => {
            trace!(target: "input", kind = event_kind(other), "event_ignored");
            None
        }
    }
}

fn event_kind(ev: &CEvent) -> &'static str {
    match ev {
        CEvent::FocusGained | CEvent::FocusLost => "focus",
        CEvent::Mouse(_) => "mouse",
        CEvent::Paste(_) => "paste",
        _ => "other",
    }
}

/// Map a crossterm key press (or auto-repeat) into a `KeyEvent`. Releases
/// and keys the editor has no binding for return `None`.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKind::Release) {
        return None;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(KeyEvent::new(code, map_mods(event.modifiers)))
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
