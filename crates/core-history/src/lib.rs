//! Version browser: a selection list over the snapshots of one file.
//!
//! The browser is pure state. The session owns it while history has focus,
//! feeds it keys, and acts on the returned `BrowserOutcome`; rendering reads
//! `versions()` and `selected()` directly.

use core_events::{KeyCode, KeyEvent};
use core_versions::{SnapshotStore, VersionError, VersionResult, VersionStamp};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TITLE: &str = "Select a version:";
pub const EMPTY_MESSAGE: &str = "No versions available.";

/// Result of feeding one key to the browser.
#[derive(Debug)]
pub enum BrowserOutcome {
    /// Still browsing.
    Pending,
    /// The selected snapshot was copied over the live file.
    Restored(VersionStamp),
    /// Restore was attempted and failed; the live file is untouched.
    RestoreFailed(VersionError),
    /// Escape with a non-empty list.
    Cancelled,
    /// Any key on the empty-list notice.
    Dismissed,
}

impl BrowserOutcome {
    /// True when the browser should give focus back to editing.
    pub fn is_finished(&self) -> bool {
        !matches!(self, BrowserOutcome::Pending)
    }
}

#[derive(Debug, Clone)]
pub struct VersionBrowser {
    file: PathBuf,
    versions: Vec<VersionStamp>,
    selected: usize,
}

impl VersionBrowser {
    /// List the versions of `file`, newest first, with the newest selected.
    pub fn open(store: &SnapshotStore, file: &Path) -> VersionResult<Self> {
        let listed = store.list_versions(file)?;
        let versions: Vec<_> = listed.into_iter().rev().collect();
        info!(target: "history", path = %file.display(), count = versions.len(), "browser_open");
        Ok(Self::with_versions(file, versions))
    }

    /// Browser over an explicit list (kept in the given order).
    pub fn with_versions(file: impl Into<PathBuf>, versions: Vec<VersionStamp>) -> Self {
        Self {
            file: file.into(),
            versions,
            selected: 0,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn versions(&self) -> &[VersionStamp] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_stamp(&self) -> Option<&VersionStamp> {
        self.versions.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.versions.len() {
            self.selected += 1;
        }
    }

    pub fn handle_key(&mut self, store: &SnapshotStore, key: &KeyEvent) -> BrowserOutcome {
        if self.versions.is_empty() {
            return BrowserOutcome::Dismissed;
        }
        match key.code {
            KeyCode::Up => {
                self.move_up();
                BrowserOutcome::Pending
            }
            KeyCode::Down => {
                self.move_down();
                BrowserOutcome::Pending
            }
            KeyCode::Esc => {
                debug!(target: "history", "browser_cancel");
                BrowserOutcome::Cancelled
            }
            KeyCode::Enter => self.restore_selected(store),
            _ => BrowserOutcome::Pending,
        }
    }

    fn restore_selected(&self, store: &SnapshotStore) -> BrowserOutcome {
        let Some(stamp) = self.selected_stamp() else {
            return BrowserOutcome::Dismissed;
        };
        match store.restore_version(&self.file, stamp, &self.file) {
            Ok(()) => BrowserOutcome::Restored(stamp.clone()),
            Err(e) => {
                warn!(target: "history", stamp = %stamp, error = %e, "restore_failed");
                BrowserOutcome::RestoreFailed(e)
            }
        }
    }
}
