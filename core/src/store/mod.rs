//! Byte-level storage drivers.
//!
//! RULE: drivers move bytes and nothing else. All decoding, validation
//! and recovery happens above this layer, in `storage.rs`.

use crate::error::SaveResult;

mod file;
mod sqlite;

pub use file::FileDriver;
pub use sqlite::SqliteDriver;

/// Raw read/write of a single record bound to a key.
pub trait StorageDriver {
    /// Replace the record's bytes.
    fn save_data(&self, data: &[u8]) -> SaveResult<()>;

    /// Read the record's bytes. `Ok(None)` when nothing has been
    /// written under this key yet.
    fn load_data(&self) -> SaveResult<Option<Vec<u8>>>;

    /// The key (file path, store key) this driver is bound to.
    fn key_name(&self) -> &str;

    /// Open a driver of the same kind bound to another key.
    fn sibling(&self, key: &str) -> SaveResult<Box<dyn StorageDriver>>;
}
