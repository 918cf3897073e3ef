//! Pending command text editing and execution (`:wq`, `:q`).
//!
//! `:wq` ordering:
//! * live file exists: snapshot the on-disk bytes, then write the buffer;
//! * live file missing: write the buffer, then snapshot the new file.
//!
//! Any failure leaves the session open with the error in the status line.
//! A failed snapshot before the write means nothing is written.

use super::DispatchResult;
use super::command_parser::{CommandParser, ParsedCommand};
use crate::Action;
use crate::io_ops::{WriteFileResult, write_file};
use core_state::EditorState;
use core_versions::SnapshotStore;
use std::path::Path;

pub(crate) fn handle_command_action(
    action: Action,
    state: &mut EditorState,
    store: &SnapshotStore,
) -> DispatchResult {
    match action {
        Action::CommandChar(ch) => {
            state.command_line.push_char(ch);
            DispatchResult::dirty()
        }
        Action::CommandBackspace => {
            state.command_line.backspace();
            DispatchResult::dirty()
        }
        Action::CommandCancel => {
            state.command_line.clear();
            DispatchResult::dirty()
        }
        Action::CommandExecute(cmd) => execute_command(&cmd, state, store),
        _ => DispatchResult::clean(),
    }
}

fn execute_command(raw: &str, state: &mut EditorState, store: &SnapshotStore) -> DispatchResult {
    let result = match CommandParser::parse(raw) {
        ParsedCommand::Quit => {
            tracing::info!(target: "runtime.command", dirty = state.dirty, "quit");
            DispatchResult::quit()
        }
        ParsedCommand::WriteQuit => handle_write_quit(state, store),
        ParsedCommand::Unknown(text) => {
            tracing::debug!(target: "runtime.command", len = text.len(), "command_unknown");
            DispatchResult::dirty()
        }
    };
    state.command_line.clear();
    result
}

fn handle_write_quit(state: &mut EditorState, store: &SnapshotStore) -> DispatchResult {
    let Some(path) = state.file_path().map(Path::to_path_buf) else {
        tracing::error!(target: "runtime.command", "write_no_filename");
        state.set_status("No file name");
        return DispatchResult::dirty();
    };

    let existed = path.exists();
    if existed && !snapshot(state, store, &path) {
        return DispatchResult::dirty();
    }
    if let WriteFileResult::Error(e) = write_file(state, &path) {
        state.set_status(format!("Write failed: {e}"));
        return DispatchResult::dirty();
    }
    if !existed && !snapshot(state, store, &path) {
        return DispatchResult::dirty();
    }
    tracing::info!(target: "runtime.command", path = %path.display(), "write_quit");
    DispatchResult::quit()
}

fn snapshot(state: &mut EditorState, store: &SnapshotStore, path: &Path) -> bool {
    match store.save_version(path) {
        Ok(stamp) => {
            tracing::debug!(target: "runtime.command", stamp = %stamp, "snapshot_taken");
            true
        }
        Err(e) => {
            tracing::error!(target: "runtime.command", error = %e, "snapshot_failed");
            state.set_status(format!("Version save failed: {e}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;
    use core_versions::{BucketKey, StoreSettings};
    use std::fs;

    fn run(raw: &str, state: &mut EditorState, store: &SnapshotStore) -> DispatchResult {
        for ch in raw.chars() {
            handle_command_action(Action::CommandChar(ch), state, store);
        }
        handle_command_action(Action::CommandExecute(raw.to_string()), state, store)
    }

    #[test]
    fn write_quit_snapshots_previous_bytes_then_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "old\n").unwrap();
        let store = SnapshotStore::for_file(&path, &StoreSettings::default());
        let mut st = EditorState::with_file(Buffer::from_text("new"), &path);
        st.dirty = true;

        let res = run(":wq", &mut st, &store);
        assert!(res.quit);
        assert!(!st.dirty);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        let versions = store.list_versions(&path).unwrap();
        assert_eq!(versions.len(), 1);
        let stamp = versions.iter().next().unwrap();
        let copy = store.snapshot_path(&path, stamp).unwrap();
        assert_eq!(fs::read_to_string(copy).unwrap(), "old\n");
    }

    #[test]
    fn write_quit_on_new_file_snapshots_written_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");
        let store = SnapshotStore::for_file(&path, &StoreSettings::default());
        let mut st = EditorState::with_file(Buffer::from_text("hi"), &path);

        assert!(run(":wq", &mut st, &store).quit);
        let versions = store.list_versions(&path).unwrap();
        assert_eq!(versions.len(), 1);
        let copy = store.snapshot_path(&path, versions.iter().next().unwrap()).unwrap();
        assert_eq!(fs::read_to_string(copy).unwrap(), "hi\n");
    }

    #[test]
    fn snapshot_failure_aborts_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "old\n").unwrap();
        // A regular file where the store root should be makes every save fail.
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "").unwrap();
        let store = SnapshotStore::new(&blocked, BucketKey::BaseName);
        let mut st = EditorState::with_file(Buffer::from_text("new"), &path);
        st.dirty = true;

        let res = run(":wq", &mut st, &store);
        assert!(!res.quit);
        assert!(st.dirty);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\n");
        assert!(st.status().unwrap().starts_with("Version save failed"));
        assert!(st.command_line.is_empty());
    }

    #[test]
    fn quit_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let store = SnapshotStore::for_file(&path, &StoreSettings::default());
        let mut st = EditorState::with_file(Buffer::from_text("unsaved"), &path);
        st.dirty = true;
        assert!(run(":q", &mut st, &store).quit);
        assert!(!path.exists());
        assert!(!store.root().exists());
    }

    #[test]
    fn backspace_and_cancel_edit_pending_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), BucketKey::BaseName);
        let mut st = EditorState::new(Buffer::new());
        for ch in ":wqx".chars() {
            handle_command_action(Action::CommandChar(ch), &mut st, &store);
        }
        handle_command_action(Action::CommandBackspace, &mut st, &store);
        assert_eq!(st.command_line.buffer(), ":wq");
        handle_command_action(Action::CommandCancel, &mut st, &store);
        assert!(st.command_line.is_empty());
    }

    #[test]
    fn write_quit_without_file_name_reports() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), BucketKey::BaseName);
        let mut st = EditorState::new(Buffer::from_text("x"));
        let res = run(":wq", &mut st, &store);
        assert!(!res.quit);
        assert_eq!(st.status(), Some("No file name"));
    }
}
