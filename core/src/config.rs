use crate::{
    catalog::Catalog,
    storage::LoadOutcome,
    types::{StorageKey, DEFAULT_SAVE_KEY},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// When the previous bytes of the primary record are archived before
/// a save overwrites them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackupPolicy {
    /// Only after a load that was not clean.
    #[default]
    OnAnomaly,
    /// Before every save.
    Always,
    Never,
}

impl BackupPolicy {
    pub fn should_backup(self, prior: LoadOutcome) -> bool {
        match self {
            BackupPolicy::OnAnomaly => prior.is_anomaly(),
            BackupPolicy::Always => true,
            BackupPolicy::Never => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct StorageConfigFile {
    save_key: StorageKey,
    backup_policy: BackupPolicy,
    corrective_save: bool,
    raw_backup_on_load: bool,
    /// Relative paths resolve against the config file's directory.
    catalog_path: Option<String>,
}

impl Default for StorageConfigFile {
    fn default() -> Self {
        Self {
            save_key: DEFAULT_SAVE_KEY.to_string(),
            backup_policy: BackupPolicy::default(),
            corrective_save: true,
            raw_backup_on_load: false,
            catalog_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub save_key: StorageKey,
    pub backup_policy: BackupPolicy,
    /// Write a salvaged state back immediately after a recovered load.
    pub corrective_save: bool,
    /// Archive the bytes of every record read, before any decoding.
    pub raw_backup_on_load: bool,
    pub catalog: Catalog,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let file = StorageConfigFile::default();
        Self {
            save_key: file.save_key,
            backup_policy: file.backup_policy,
            corrective_save: file.corrective_save,
            raw_backup_on_load: file.raw_backup_on_load,
            catalog: Catalog::standard(),
        }
    }
}

impl StorageConfig {
    /// Load from a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let file: StorageConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {}", path.display()))?;

        let catalog = match &file.catalog_path {
            Some(p) => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                Catalog::load(base.join(p))?
            }
            None => Catalog::standard(),
        };

        Ok(Self {
            save_key: file.save_key,
            backup_policy: file.backup_policy,
            corrective_save: file.corrective_save,
            raw_backup_on_load: file.raw_backup_on_load,
            catalog,
        })
    }

    pub fn with_save_key(mut self, key: impl Into<StorageKey>) -> Self {
        self.save_key = key.into();
        self
    }

    pub fn with_backup_policy(mut self, policy: BackupPolicy) -> Self {
        self.backup_policy = policy;
        self
    }

    pub fn with_corrective_save(mut self, enabled: bool) -> Self {
        self.corrective_save = enabled;
        self
    }

    pub fn with_raw_backup_on_load(mut self, enabled: bool) -> Self {
        self.raw_backup_on_load = enabled;
        self
    }
}
