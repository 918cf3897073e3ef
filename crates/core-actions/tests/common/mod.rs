#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{EditSession, KeyBindings, SessionStep};
use core_events::{Event, KeyCode, KeyEvent};
use core_versions::StoreSettings;
use std::path::Path;

pub const TEXT_ROWS: usize = 5;

pub fn open(path: &Path) -> EditSession {
    EditSession::with_settings(path, &StoreSettings::default(), KeyBindings::default(), TEXT_ROWS)
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::plain(code))
}

pub fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::ctrl(c))
}

/// One event per character; `\n` becomes Enter.
pub fn typed(text: &str) -> Vec<Event> {
    text.chars()
        .map(|c| match c {
            '\n' => key(KeyCode::Enter),
            c => key(KeyCode::Char(c)),
        })
        .collect()
}

/// Feed events until one returns `Quit`; returns the step of the last event.
pub fn feed<I: IntoIterator<Item = Event>>(session: &mut EditSession, events: I) -> SessionStep {
    let mut last = SessionStep::Continue;
    for ev in events {
        last = session.handle_event(&ev);
        if last == SessionStep::Quit {
            break;
        }
    }
    last
}

pub fn lines(session: &EditSession) -> Vec<String> {
    session.model().state().buffer().lines().to_vec()
}
