//! Core event types for revi.
//!
//! The runtime is single-threaded: the input layer performs one blocking read
//! per loop iteration and hands the normalized `Event` to the session. These
//! types intentionally carry no terminal-library types so the session and the
//! version browser can be driven from scripted input in tests.

use std::fmt;
use std::str::FromStr;

/// Top-level event consumed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

/// Normalized logical keys. Anything the editor has no use for never makes it
/// past the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key (shift is folded into the character itself).
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// The printable character this key produces, if any. Control and alt
    /// chords never print.
    pub fn printable(&self) -> Option<char> {
        if self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return None;
        }
        match self.code {
            KeyCode::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// True when `self` is the same chord as `other`, treating SHIFT as
    /// insignificant (terminals disagree on whether they report it).
    pub fn matches(&self, other: &KeyEvent) -> bool {
        let strip = |m: KeyModifiers| m - KeyModifiers::SHIFT;
        let fold = |c: KeyCode| match c {
            KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
            other => other,
        };
        fold(self.code) == fold(other.code) && strip(self.mods) == strip(other.mods)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("ctrl-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("alt-")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
        }
    }
}

/// Error returned when a textual key name (as written in `revi.toml`) cannot
/// be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized key `{}`", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for KeyEvent {
    type Err = KeyParseError;

    /// Accepted forms: `ctrl-<c>`, `alt-<c>`, `f<n>`, named keys (`esc`,
    /// `tab`, ...) and a single character. Prefixes may be chained
    /// (`ctrl-alt-x`) and are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError(s.to_string());
        let mut mods = KeyModifiers::empty();
        let mut rest = s.trim();
        loop {
            let lower = rest.to_ascii_lowercase();
            if lower.starts_with("ctrl-") && rest.len() > 5 {
                mods |= KeyModifiers::CTRL;
                rest = &rest[5..];
            } else if lower.starts_with("alt-") && rest.len() > 4 {
                mods |= KeyModifiers::ALT;
                rest = &rest[4..];
            } else {
                break;
            }
        }
        let lower = rest.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "tab" => KeyCode::Tab,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let c = if mods.is_empty() {
                            c
                        } else {
                            c.to_ascii_lowercase()
                        };
                        KeyCode::Char(c)
                    }
                    (Some('f' | 'F'), Some(_)) => {
                        let n: u8 = rest[1..].parse().map_err(|_| err())?;
                        if n == 0 {
                            return Err(err());
                        }
                        KeyCode::F(n)
                    }
                    _ => return Err(err()),
                }
            }
        };
        Ok(KeyEvent { code, mods })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ctrl_chord() {
        let k: KeyEvent = "ctrl-h".parse().unwrap();
        assert_eq!(k, KeyEvent::ctrl('h'));
        let upper: KeyEvent = "Ctrl-H".parse().unwrap();
        assert_eq!(upper, KeyEvent::ctrl('h'));
    }

    #[test]
    fn parses_function_and_named_keys() {
        assert_eq!("f2".parse::<KeyEvent>().unwrap().code, KeyCode::F(2));
        assert_eq!("esc".parse::<KeyEvent>().unwrap().code, KeyCode::Esc);
        assert_eq!(
            "alt-v".parse::<KeyEvent>().unwrap(),
            KeyEvent::new(KeyCode::Char('v'), KeyModifiers::ALT)
        );
    }

    #[test]
    fn single_char_keeps_case() {
        assert_eq!(
            "H".parse::<KeyEvent>().unwrap(),
            KeyEvent::plain(KeyCode::Char('H'))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("ctrl-".parse::<KeyEvent>().is_err());
        assert!("banana".parse::<KeyEvent>().is_err());
        assert!("f0".parse::<KeyEvent>().is_err());
        assert!("".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn printable_excludes_chords() {
        assert_eq!(KeyEvent::plain(KeyCode::Char('a')).printable(), Some('a'));
        assert_eq!(KeyEvent::ctrl('a').printable(), None);
        assert_eq!(KeyEvent::plain(KeyCode::Enter).printable(), None);
    }

    #[test]
    fn matches_ignores_shift() {
        let bound = KeyEvent::ctrl('h');
        let seen = KeyEvent::new(
            KeyCode::Char('H'),
            KeyModifiers::CTRL | KeyModifiers::SHIFT,
        );
        assert!(bound.matches(&seen));
        assert!(!bound.matches(&KeyEvent::plain(KeyCode::Char('h'))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for name in ["ctrl-h", "f5", "alt-x", "esc"] {
            let k: KeyEvent = name.parse().unwrap();
            assert_eq!(k.to_string(), name);
        }
    }
}
