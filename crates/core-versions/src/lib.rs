//! Per-file version history.
//!
//! Every save of a file copies its on-disk bytes into an immutable snapshot
//! directory named by a local-time stamp. Snapshots of one file share a
//! bucket named by a SHA-256 digest of the file's base name (or absolute
//! path), and the bucket's `HEAD` records the latest stamp.
//!
//! # Example
//!
//! ```no_run
//! use core_versions::{SnapshotStore, StoreSettings};
//! use std::path::Path;
//!
//! # fn example() -> core_versions::VersionResult<()> {
//! let file = Path::new("notes.txt");
//! let store = SnapshotStore::for_file(file, &StoreSettings::default());
//!
//! // Snapshot the current bytes before overwriting the file.
//! let stamp = store.save_version(file)?;
//!
//! // ... write new content ...
//!
//! // Bring the old bytes back.
//! store.restore_version(file, &stamp, file)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod stamp;
mod store;

pub use error::{VersionError, VersionResult};
pub use stamp::{BucketId, BucketKey, VersionStamp};
pub use store::{DEFAULT_VERSIONS_DIR, HEAD_FILE, SnapshotStore, StoreSettings};
