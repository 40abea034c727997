//! `db` crate: pure persistence layer.
//!
//! Exposes the durable state slot: a named key holding one serialized
//! snapshot.  Callers decide what goes in a slot; no domain types live here.

pub mod error;
pub mod file;
pub mod memory;
pub mod slot;

pub use error::DbError;
pub use file::FileSlot;
pub use memory::MemorySlot;
pub use slot::SnapshotSlot;
