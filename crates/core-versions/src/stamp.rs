//! Version stamps and bucket identities.

use crate::{VersionError, VersionResult};
use chrono::{Local, NaiveDateTime};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const STAMP_LEN: usize = 14;

/// Local-time `YYYYMMDDHHMMSS` stamp naming one snapshot directory.
///
/// Fixed width, so string order is chronological order and the derived `Ord`
/// sorts versions by age.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionStamp(String);

impl VersionStamp {
    /// Stamp for the current local time (second resolution).
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.format(STAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar time the stamp denotes.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, STAMP_FORMAT).ok()
    }
}

impl FromStr for VersionStamp {
    type Err = VersionError;

    fn from_str(s: &str) -> VersionResult<Self> {
        let well_formed = s.len() == STAMP_LEN
            && s.bytes().all(|b| b.is_ascii_digit())
            && NaiveDateTime::parse_from_str(s, STAMP_FORMAT).is_ok();
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(VersionError::InvalidStamp(s.to_string()))
        }
    }
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which part of the file path identifies its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketKey {
    /// The base name only: `a/notes.txt` and `b/notes.txt` share history when
    /// their store roots coincide.
    #[default]
    BaseName,
    /// The absolute path.
    FullPath,
}

/// Hex SHA-256 digest naming a file's bucket directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketId(String);

impl BucketId {
    pub fn for_file(path: &Path, key: BucketKey) -> VersionResult<Self> {
        let ident = match key {
            BucketKey::BaseName => path
                .file_name()
                .ok_or_else(|| VersionError::invalid_path(path))?
                .to_string_lossy()
                .into_owned(),
            BucketKey::FullPath => std::path::absolute(path)?
                .to_string_lossy()
                .into_owned(),
        };
        Ok(Self::digest(&ident))
    }

    pub fn digest(ident: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(ident.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
