//! The editing session: one file, its buffer and view, its snapshot store,
//! and which of editing or the version browser currently receives keys.
//!
//! Opening the browser is a focus switch, not a nested loop: the runtime
//! keeps feeding events to `handle_event` and renders whatever `focus()`
//! reports.

use crate::io_ops::{OpenFileResult, open_file};
use crate::{KeyBindings, dispatch, translate_key};
use core_config::Config;
use core_events::{Event, KeyEvent};
use core_history::{BrowserOutcome, VersionBrowser};
use core_model::EditorModel;
use core_state::EditorState;
use core_versions::{SnapshotStore, StoreSettings};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Status shown when a file had to be decoded lossily.
pub const LOSSY_WARNING: &str = "File is not valid UTF-8; saving will replace invalid bytes";

/// Who receives the next key.
#[derive(Debug)]
pub enum Focus {
    Editing,
    History(VersionBrowser),
}

/// What the runtime should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct EditSession {
    model: EditorModel,
    store: SnapshotStore,
    bindings: KeyBindings,
    focus: Focus,
    path: PathBuf,
}

impl EditSession {
    /// Load `path` (a missing file is an empty buffer) with `text_rows` rows
    /// of text on screen.
    pub fn open(path: impl Into<PathBuf>, config: &Config, text_rows: usize) -> Self {
        Self::with_settings(
            path,
            &config.store_settings(),
            KeyBindings::from(config),
            text_rows,
        )
    }

    pub fn with_settings(
        path: impl Into<PathBuf>,
        settings: &StoreSettings,
        bindings: KeyBindings,
        text_rows: usize,
    ) -> Self {
        let path = path.into();
        let store = SnapshotStore::for_file(&path, settings);
        let loaded = open_file(&path);
        let notice = match &loaded {
            OpenFileResult::Error(e) => Some(format!("Could not read file: {e}")),
            OpenFileResult::Loaded { lossy: true, .. } => Some(LOSSY_WARNING.to_string()),
            _ => None,
        };
        let mut state = EditorState::with_file(loaded.into_buffer(), &path);
        if let Some(msg) = notice {
            state.set_status(msg);
        }
        info!(target: "runtime", path = %path.display(), store = %store.root().display(), "session_open");
        Self {
            model: EditorModel::new(state, text_rows),
            store,
            bindings,
            focus: Focus::Editing,
            path,
        }
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn browser(&self) -> Option<&VersionBrowser> {
        match &self.focus {
            Focus::History(b) => Some(b),
            Focus::Editing => None,
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> SessionStep {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, rows) => {
                let text_rows = usize::from(rows.saturating_sub(1)).max(1);
                self.model.view_mut().set_height(text_rows);
                SessionStep::Continue
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> SessionStep {
        if let Focus::History(browser) = &mut self.focus {
            let outcome = browser.handle_key(&self.store, key);
            if outcome.is_finished() {
                self.focus = Focus::Editing;
                self.finish_history(outcome);
            }
            return SessionStep::Continue;
        }

        self.model.state_mut().clear_status();
        let action = {
            let state = self.model.state();
            translate_key(state.mode, state.command_line.buffer(), key, &self.bindings)
        };
        let Some(action) = action else {
            return SessionStep::Continue;
        };
        let result = dispatch(action, &mut self.model, &self.store);
        if result.open_history {
            self.open_history();
        }
        if result.quit {
            SessionStep::Quit
        } else {
            SessionStep::Continue
        }
    }

    fn open_history(&mut self) {
        match VersionBrowser::open(&self.store, &self.path) {
            Ok(browser) => self.focus = Focus::History(browser),
            Err(e) => {
                warn!(target: "history", error = %e, "browser_open_failed");
                self.model
                    .state_mut()
                    .set_status(format!("Could not list versions: {e}"));
            }
        }
    }

    fn finish_history(&mut self, outcome: BrowserOutcome) {
        match outcome {
            BrowserOutcome::Restored(stamp) => self.reload_from_disk(&format!("Restored version {stamp}")),
            BrowserOutcome::RestoreFailed(e) => {
                self.model
                    .state_mut()
                    .set_status(format!("Restore failed: {e}"));
            }
            BrowserOutcome::Cancelled | BrowserOutcome::Dismissed | BrowserOutcome::Pending => {}
        }
    }

    fn reload_from_disk(&mut self, message: &str) {
        let (state, view) = self.model.split_state_and_view();
        match open_file(&self.path) {
            OpenFileResult::Loaded { buffer, lossy } => {
                state.replace_buffer(buffer);
                view.reset();
                if lossy {
                    state.set_status(format!("{message}. {LOSSY_WARNING}"));
                } else {
                    state.set_status(message);
                }
                info!(target: "runtime", path = %self.path.display(), "buffer_reloaded");
            }
            OpenFileResult::Missing => {
                state.set_status("Restored file vanished");
            }
            OpenFileResult::Error(e) => {
                state.set_status(format!("Could not read file: {e}"));
            }
        }
    }
}
