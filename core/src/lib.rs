//! Save-game persistence for the clicker: durable save and tolerant load.
//!
//! `storage::GameStorage` is the entry point. Everything else is the
//! machinery it drives: the wire codec, validation and repair, partial
//! recovery, the legacy adapter, the monotonic merger, and backups.

pub mod backup;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod legacy;
pub mod merge;
pub mod recovery;
pub mod repair;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod store;
pub mod types;
pub mod validate;

pub use config::{BackupPolicy, StorageConfig};
pub use error::{SaveError, SaveResult};
pub use state::GameState;
pub use storage::{GameStorage, LoadOutcome, Loaded, SaveSession};
