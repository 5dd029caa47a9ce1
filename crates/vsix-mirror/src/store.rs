//! Artifact store
//!
//! The destination directory of one mirror run. Owns existence checks and
//! writes; file mtimes come from the gallery's publication timestamps, so
//! re-runs and sync tooling see stable dates rather than fetch times.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Publication timestamp could not be parsed
    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// On-disk store rooted at the run's destination directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Initialize the store, creating the destination directory
    pub fn init(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of an artifact
    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Whether an artifact is already present. Presence is the
    /// completed-download marker; existing files are never re-fetched.
    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).exists()
    }

    /// Write artifact bytes and stamp the mtime from the publication time
    pub fn write(
        &self,
        filename: &str,
        bytes: &[u8],
        last_updated: &str,
    ) -> Result<PathBuf, StoreError> {
        let mtime = parse_timestamp(last_updated)?;

        let path = self.path(filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;

        let file = fs::OpenOptions::new().write(true).open(&path)?;
        file.set_modified(mtime)?;

        Ok(path)
    }
}

/// Parse a gallery publication timestamp into a file mtime
pub fn parse_timestamp(value: &str) -> Result<SystemTime, StoreError> {
    let parsed =
        chrono::DateTime::parse_from_rfc3339(value).map_err(|source| StoreError::Timestamp {
            value: value.to_string(),
            source,
        })?;
    Ok(parsed.into())
}
