//! Shared primitive types used across the persistence engine.

/// Position of a building in the catalog. Also its index in every
/// buildings list on the wire.
pub type BuildingIndex = usize;

/// Stable identifier of an upgrade, e.g. `"0_1"` or `"manual_0"`.
pub type UpgradeId = String;

/// Name a storage driver binds its record to (file path or store key).
pub type StorageKey = String;

/// Key used when nothing else is configured.
pub const DEFAULT_SAVE_KEY: &str = "game_state.json";
