//! Command text classification.
//!
//! Only exact matches are commands: `:wq` saves a version, writes and quits;
//! `:q` quits. Surrounding whitespace is not trimmed. Everything else is
//! `Unknown` and the caller discards it silently.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    WriteQuit,
    Quit,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        match raw {
            ":wq" => ParsedCommand::WriteQuit,
            ":q" => ParsedCommand::Quit,
            other => ParsedCommand::Unknown(other.to_string()),
        }
    }
}
