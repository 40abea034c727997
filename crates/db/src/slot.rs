//! The `SnapshotSlot` trait: a key-value facility holding whole snapshots.

use crate::DbError;

/// Durable key-value slot.
///
/// Each key holds one complete snapshot; a write replaces the previous
/// contents wholesale (last write wins).
pub trait SnapshotSlot: Send + Sync {
    /// Read the contents stored under `key`. An absent key is `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, DbError>;

    /// Replace the contents stored under `key`.
    fn write(&self, key: &str, contents: &str) -> Result<(), DbError>;

    /// Drop `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), DbError>;
}
