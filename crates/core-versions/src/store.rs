//! Snapshot storage implementation.

use crate::{BucketId, BucketKey, VersionError, VersionResult, VersionStamp};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the store directory created next to edited files.
pub const DEFAULT_VERSIONS_DIR: &str = ".versions";

/// Per-bucket file holding the most recent stamp.
pub const HEAD_FILE: &str = "HEAD";

/// How a store for a given file is located and keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Directory name created next to the edited file.
    pub directory: String,
    pub key: BucketKey,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            directory: DEFAULT_VERSIONS_DIR.to_string(),
            key: BucketKey::default(),
        }
    }
}

/// Storage for whole-file snapshots.
///
/// Snapshots are plain copies in a directory structure:
/// ```text
/// root/
///   <bucket-hex>/
///     HEAD                 # latest stamp
///     <stamp>/
///       <basename>         # file bytes at save time
/// ```
/// Snapshots are immutable once written; the store never updates or deletes
/// one.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    key: BucketKey,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>, key: BucketKey) -> Self {
        Self {
            root: root.into(),
            key,
        }
    }

    /// Store rooted at `<file's directory>/<settings.directory>`.
    pub fn for_file(file: &Path, settings: &StoreSettings) -> Self {
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::new(dir.join(&settings.directory), settings.key)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_id(&self, file: &Path) -> VersionResult<BucketId> {
        BucketId::for_file(file, self.key)
    }

    pub fn bucket_dir(&self, file: &Path) -> VersionResult<PathBuf> {
        Ok(self.root.join(self.bucket_id(file)?.as_str()))
    }

    pub fn version_dir(&self, file: &Path, stamp: &VersionStamp) -> VersionResult<PathBuf> {
        Ok(self.bucket_dir(file)?.join(stamp.as_str()))
    }

    /// Path of the snapshot copy for `stamp`.
    pub fn snapshot_path(&self, file: &Path, stamp: &VersionStamp) -> VersionResult<PathBuf> {
        Ok(self.version_dir(file, stamp)?.join(base_name(file)?))
    }

    /// Snapshot the on-disk bytes of `file` under the current local time.
    pub fn save_version(&self, file: &Path) -> VersionResult<VersionStamp> {
        self.save_version_at(file, VersionStamp::now())
    }

    /// Snapshot the on-disk bytes of `file` under `stamp`, then point HEAD at
    /// it. On failure nothing is left behind and HEAD is unchanged.
    pub fn save_version_at(&self, file: &Path, stamp: VersionStamp) -> VersionResult<VersionStamp> {
        let id = self.bucket_id(file)?;
        let bucket = self.root.join(id.as_str());
        let dir = bucket.join(stamp.as_str());
        let target = dir.join(base_name(file)?);

        fs::create_dir_all(&bucket)?;
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(target: "versions", stamp = %stamp, "version_exists");
                return Err(VersionError::AlreadyExists(stamp.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let result = fs::copy(file, &target).and_then(|_| write_head(&bucket, &stamp));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                warn!(target: "versions", path = %dir.display(), error = %cleanup, "partial_version_cleanup_failed");
            }
            warn!(target: "versions", path = %file.display(), error = %e, "version_save_failed");
            return Err(e.into());
        }

        info!(target: "versions", bucket = %id, stamp = %stamp, "version_saved");
        Ok(stamp)
    }

    /// Every stamp saved for `file`. HEAD and anything that is not a stamp
    /// directory are skipped. A bucket that does not exist yet is empty.
    pub fn list_versions(&self, file: &Path) -> VersionResult<BTreeSet<VersionStamp>> {
        let bucket = self.bucket_dir(file)?;
        let entries = match fs::read_dir(&bucket) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(target: "versions", path = %file.display(), "no_versions");
                return Ok(BTreeSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut stamps = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str().map(str::parse::<VersionStamp>) {
                Some(Ok(stamp)) => {
                    stamps.insert(stamp);
                }
                _ => debug!(target: "versions", entry = %name.to_string_lossy(), "skip_non_version_entry"),
            }
        }
        debug!(target: "versions", count = stamps.len(), "versions_listed");
        Ok(stamps)
    }

    /// Copy the snapshot for `stamp` over `destination`, creating parent
    /// directories. A missing snapshot leaves `destination` untouched.
    ///
    /// An existing destination is resolved through symlinks first, so the
    /// bytes land in the link target and the link itself survives.
    pub fn restore_version(
        &self,
        file: &Path,
        stamp: &VersionStamp,
        destination: &Path,
    ) -> VersionResult<()> {
        let source = self.snapshot_path(file, stamp)?;
        if !source.is_file() {
            warn!(target: "versions", stamp = %stamp, "version_not_found");
            return Err(VersionError::RestoreNotFound(stamp.to_string()));
        }
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        match fs::canonicalize(destination) {
            Ok(target) => {
                // Stage beside the resolved target, then rename over it.
                let staging = staging_path(&target)?;
                if let Err(e) = fs::copy(&source, &staging).and_then(|_| fs::rename(&staging, &target)) {
                    let _ = fs::remove_file(&staging);
                    return Err(e.into());
                }
            }
            // Nothing there yet, or a dangling link: copy writes through it.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::copy(&source, destination)?;
            }
            Err(e) => return Err(e.into()),
        }
        info!(target: "versions", stamp = %stamp, path = %destination.display(), "version_restored");
        Ok(())
    }

    /// Stamp recorded in HEAD, if any.
    pub fn latest_version(&self, file: &Path) -> VersionResult<Option<VersionStamp>> {
        let head = self.bucket_dir(file)?.join(HEAD_FILE);
        let text = match fs::read_to_string(&head) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse().map(Some)
    }
}

fn base_name(file: &Path) -> VersionResult<&OsStr> {
    file.file_name().ok_or_else(|| VersionError::invalid_path(file))
}

fn staging_path(destination: &Path) -> VersionResult<PathBuf> {
    let name = base_name(destination)?;
    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(".restore");
    Ok(destination.with_file_name(staged))
}

/// Replace HEAD via a temporary file and rename.
fn write_head(bucket: &Path, stamp: &VersionStamp) -> io::Result<()> {
    let tmp = bucket.join(format!("{HEAD_FILE}.tmp"));
    fs::write(&tmp, stamp.as_str())?;
    fs::rename(&tmp, bucket.join(HEAD_FILE))
}
