//! Filesystem-backed slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{DbError, SnapshotSlot};

/// Filesystem slot.
///
/// Each key is stored at `{base_path}/{key}.json`. The base directory is
/// created on first write. Writes land in a sibling temp file and are
/// renamed into place so a reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileSlot {
    base_path: PathBuf,
}

impl FileSlot {
    /// Create a new file slot rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

impl SnapshotSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        match fs::read_to_string(self.key_to_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DbError::Io(e)),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DbError> {
        let path = self.key_to_path(key);
        fs::create_dir_all(&self.base_path)?;

        let tmp = self.base_path.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;

        debug!("wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DbError> {
        match fs::remove_file(self.key_to_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DbError::Io(e)),
        }
    }
}
