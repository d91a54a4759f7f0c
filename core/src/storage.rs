//! The storage orchestrator: the only part of the persistence engine
//! the rest of the game touches.
//!
//! LOAD PIPELINE (fixed order):
//!   1. Read raw bytes. A driver failure ends here with a new-game
//!      state and the error. With `raw_backup_on_load`, the bytes are
//!      archived as read.
//!   2. Build the legacy migration candidate (clean legacy decode, or
//!      legacy field extraction).
//!   3. Decode the current schema. On failure, extract field by field.
//!   4. Validate. On failure, repair.
//!   5. Merge the legacy candidate in, convert to a `GameState`.
//!   6. If anything was salvaged, write the result straight back.
//!
//! RULE: every branch except a failed read yields a usable state and no
//! error. Decode and validation problems never reach the caller.

use crate::{
    backup::BackupManager,
    catalog::Catalog,
    codec,
    config::StorageConfig,
    error::{SaveError, SaveResult},
    legacy,
    merge::merge,
    recovery,
    repair::repair,
    snapshot::Snapshot,
    state::GameState,
    store::{FileDriver, SqliteDriver, StorageDriver},
    validate::validate,
};
use serde::Serialize;

/// How the last load went. Passed into the next save so backups can be
/// taken before anomalous bytes are overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nothing stored yet.
    Empty,
    /// Current schema, decoded and valid.
    Clean,
    /// Legacy fields contributed to the state.
    Migrated,
    /// Decode or validation failed; the state was salvaged.
    Recovered,
    /// The driver could not read the record.
    Failed,
}

impl LoadOutcome {
    pub fn is_anomaly(self) -> bool {
        matches!(self, Self::Migrated | Self::Recovered | Self::Failed)
    }
}

#[derive(Debug)]
pub struct Loaded {
    pub state: GameState,
    pub outcome: LoadOutcome,
    /// Set only when `outcome` is `Failed`.
    pub error: Option<SaveError>,
}

pub struct GameStorage {
    driver: Box<dyn StorageDriver>,
    config: StorageConfig,
    backups: BackupManager,
}

impl GameStorage {
    pub fn new(driver: Box<dyn StorageDriver>, config: StorageConfig) -> Self {
        Self { driver, config, backups: BackupManager::new() }
    }

    /// File-backed storage at `config.save_key`.
    pub fn open_file(config: StorageConfig) -> Self {
        let driver = FileDriver::new(config.save_key.clone());
        Self::new(Box::new(driver), config)
    }

    /// SQLite-backed storage at `db_path`, record keyed by `config.save_key`.
    pub fn open_sqlite(db_path: &str, config: StorageConfig) -> SaveResult<Self> {
        let driver = SqliteDriver::open(db_path, config.save_key.clone())?;
        Ok(Self::new(Box::new(driver), config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config.catalog
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn driver(&self) -> &dyn StorageDriver {
        self.driver.as_ref()
    }

    /// Encode and write `state`. When `prior` calls for it, the bytes
    /// being replaced are archived first; a failed backup never blocks
    /// the save. Encode and write errors are returned unmodified.
    pub fn save_game_state(&self, state: &GameState, prior: LoadOutcome) -> SaveResult<()> {
        let snapshot = Snapshot::capture(state, &self.config.catalog);
        let data = codec::encode(&snapshot)?;

        if self.config.backup_policy.should_backup(prior) {
            if let Err(e) = self.backups.archive(self.driver.as_ref()) {
                log::warn!("Failed to create backup: {e}");
            }
        }

        self.driver.save_data(&data)?;
        log::debug!("Saved {} bytes to '{}'", data.len(), self.driver.key_name());
        Ok(())
    }

    pub fn load_game_state(&self) -> Loaded {
        let catalog = &self.config.catalog;

        let raw = match self.driver.load_data() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No save under '{}', starting a new game", self.driver.key_name());
                return Loaded {
                    state: GameState::new(catalog),
                    outcome: LoadOutcome::Empty,
                    error: None,
                };
            }
            Err(e) => {
                log::error!("Failed to load data from '{}': {e}", self.driver.key_name());
                return Loaded {
                    state: GameState::new(catalog),
                    outcome: LoadOutcome::Failed,
                    error: Some(e),
                };
            }
        };

        if self.config.raw_backup_on_load {
            if let Err(e) = self.backups.archive_raw(self.driver.as_ref(), &raw) {
                log::warn!("Failed to backup raw data: {e}");
            }
        }

        let candidate = legacy::migration_candidate(&raw, catalog);

        let (snapshot, outcome) = match codec::decode(&raw) {
            Err(e) => {
                log::warn!("Failed to decode save, attempting partial recovery: {e}");
                (recovery::extract(&raw, catalog), LoadOutcome::Recovered)
            }
            Ok(snapshot) => match validate(&snapshot, catalog) {
                Err(invalid) => (repair(snapshot, &invalid, catalog), LoadOutcome::Recovered),
                Ok(()) if candidate.found => {
                    log::info!("Migrating legacy save under '{}'", self.driver.key_name());
                    (snapshot, LoadOutcome::Migrated)
                }
                Ok(()) => (snapshot, LoadOutcome::Clean),
            },
        };

        self.settle(snapshot, &candidate.snapshot, outcome)
    }

    fn settle(&self, mut snapshot: Snapshot, legacy: &Snapshot, mut outcome: LoadOutcome) -> Loaded {
        merge(&mut snapshot, legacy);

        let (state, dropped) = snapshot.to_game_state(&self.config.catalog);
        if dropped > 0 && outcome != LoadOutcome::Recovered {
            log::warn!("{dropped} entries did not fit the game state, treating load as recovered");
            outcome = LoadOutcome::Recovered;
        }

        if outcome == LoadOutcome::Recovered && self.config.corrective_save {
            match self.save_game_state(&state, outcome) {
                Ok(()) => log::info!("Saved recovered state back to '{}'", self.driver.key_name()),
                Err(e) => log::warn!("Failed to save fixed state: {e}"),
            }
        }

        Loaded { state, outcome, error: None }
    }
}

/// Carries the last load outcome into the next save, for callers that
/// would rather not thread it through themselves.
pub struct SaveSession {
    storage: GameStorage,
    last_outcome: LoadOutcome,
}

impl SaveSession {
    pub fn new(storage: GameStorage) -> Self {
        Self { storage, last_outcome: LoadOutcome::Empty }
    }

    pub fn load(&mut self) -> Loaded {
        let loaded = self.storage.load_game_state();
        self.last_outcome = loaded.outcome;
        loaded
    }

    /// Once a save lands, the bytes that made the last load anomalous
    /// have been archived and replaced, so later saves skip the backup.
    pub fn save(&mut self, state: &GameState) -> SaveResult<()> {
        self.storage.save_game_state(state, self.last_outcome)?;
        self.last_outcome = LoadOutcome::Clean;
        Ok(())
    }

    pub fn last_outcome(&self) -> LoadOutcome {
        self.last_outcome
    }

    pub fn storage(&self) -> &GameStorage {
        &self.storage
    }
}
