//! Best-effort archival of a record's previous bytes.
//!
//! Backups are write-only: nothing in the engine reads them back. They
//! exist so a human can restore a record by hand.

use crate::{error::SaveResult, store::StorageDriver, types::StorageKey};
use chrono::{Local, NaiveDateTime};

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// `<primary-key>.<YYYYMMDD-HHMMSS>.bak`
pub fn backup_key(primary: &str, at: NaiveDateTime) -> StorageKey {
    format!("{primary}.{}.bak", at.format(BACKUP_TIMESTAMP_FORMAT))
}

/// `<primary-key>.<YYYYMMDD-HHMMSS>.raw.bak`
pub fn raw_backup_key(primary: &str, at: NaiveDateTime) -> StorageKey {
    format!("{primary}.{}.raw.bak", at.format(BACKUP_TIMESTAMP_FORMAT))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BackupManager;

impl BackupManager {
    pub fn new() -> Self {
        Self
    }

    /// Copy the primary record's current bytes, unmodified, to a
    /// timestamped sibling key. Returns the key written, or `None` when
    /// there was nothing to write.
    pub fn archive(&self, primary: &dyn StorageDriver) -> SaveResult<Option<StorageKey>> {
        self.archive_at(primary, Local::now().naive_local())
    }

    pub fn archive_at(
        &self,
        primary: &dyn StorageDriver,
        at: NaiveDateTime,
    ) -> SaveResult<Option<StorageKey>> {
        let Some(data) = primary.load_data()? else {
            log::debug!("No existing record under '{}', skipping backup", primary.key_name());
            return Ok(None);
        };
        self.write_once(primary, backup_key(primary.key_name(), at), &data)
    }

    /// Archive bytes just read from the primary record, before the load
    /// pipeline touches them.
    pub fn archive_raw(
        &self,
        primary: &dyn StorageDriver,
        data: &[u8],
    ) -> SaveResult<Option<StorageKey>> {
        self.archive_raw_at(primary, data, Local::now().naive_local())
    }

    pub fn archive_raw_at(
        &self,
        primary: &dyn StorageDriver,
        data: &[u8],
        at: NaiveDateTime,
    ) -> SaveResult<Option<StorageKey>> {
        self.write_once(primary, raw_backup_key(primary.key_name(), at), data)
    }

    fn write_once(
        &self,
        primary: &dyn StorageDriver,
        key: StorageKey,
        data: &[u8],
    ) -> SaveResult<Option<StorageKey>> {
        let target = primary.sibling(&key)?;
        // Two archives within the same second share a key. The first one
        // holds the older bytes, so it wins.
        if target.load_data()?.is_some() {
            log::debug!("Backup '{key}' already exists, keeping it");
            return Ok(None);
        }
        target.save_data(data)?;
        log::info!("Backed up {} bytes to '{key}'", data.len());
        Ok(Some(key))
    }
}
