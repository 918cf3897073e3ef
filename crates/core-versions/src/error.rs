//! Version store error types.

use thiserror::Error;

/// Result type for version store operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Errors that can occur while saving, listing or restoring versions.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Filesystem failure (copy, directory creation, HEAD update).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested snapshot does not exist in the bucket.
    #[error("Version not found: {0}")]
    RestoreNotFound(String),

    /// A snapshot with this stamp was already taken (two saves in one second).
    #[error("Version already exists: {0}")]
    AlreadyExists(String),

    /// Text that is not a `YYYYMMDDHHMMSS` stamp.
    #[error("Invalid version stamp: {0}")]
    InvalidStamp(String),
}

impl VersionError {
    pub(crate) fn invalid_path(path: &std::path::Path) -> Self {
        Self::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path has no file name: {}", path.display()),
        ))
    }
}
