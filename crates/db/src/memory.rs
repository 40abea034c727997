//! In-process slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{DbError, SnapshotSlot};

/// In-memory slot implementation.
///
/// Clones share the same backing map, so a test can hand one clone to a
/// store and inspect what was written through another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with raw contents.
    pub fn with_entry(self, key: impl Into<String>, contents: impl Into<String>) -> Self {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), contents.into());
        self
    }
}

impl SnapshotSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), DbError> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), contents.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DbError> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
