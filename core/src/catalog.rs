//! Known building and upgrade definitions.
//!
//! The persistence engine only cares about how many definitions exist
//! and how upgrades are identified, but the catalog carries the full
//! definition data so a catalog file can be shared with the game.
//!
//! RULE: upgrade order is part of the legacy save contract. Legacy
//! records store upgrades as a positional list of flags, so entries
//! may be appended but never reordered.

use crate::types::{BuildingIndex, UpgradeId};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingDef {
    pub id: BuildingIndex,
    pub name: String,
    pub base_cost: f64,
    pub base_generate_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeTarget {
    ManualWork,
    Building { index: BuildingIndex },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub cost: f64,
    pub target: UpgradeTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub buildings: Vec<BuildingDef>,
    pub upgrades: Vec<UpgradeDef>,
}

impl Catalog {
    /// The definitions shipped with the game.
    pub fn standard() -> Self {
        let buildings: Vec<BuildingDef> = (0..8)
            .map(|i| BuildingDef {
                id: i,
                name: format!("Building {}", i + 1),
                base_cost: 10f64.powi(i as i32),
                base_generate_rate: 0.01 * 10f64.powi(i as i32),
            })
            .collect();

        // Manual work upgrades first: position 0 is what the legacy
        // format called its only upgrade.
        let mut upgrades = vec![
            UpgradeDef {
                id: "manual_0".to_string(),
                name: "Manual Work Upgrade 1".to_string(),
                cost: 10.0,
                target: UpgradeTarget::ManualWork,
            },
            UpgradeDef {
                id: "manual_1".to_string(),
                name: "Manual Work Upgrade 2".to_string(),
                cost: 1_000.0,
                target: UpgradeTarget::ManualWork,
            },
        ];
        for b in &buildings {
            for tier in 0..2 {
                upgrades.push(UpgradeDef {
                    id: format!("{}_{}", b.id, tier),
                    name: format!("{} Upgrade {}", b.name, tier + 1),
                    cost: b.base_cost * 10f64.powi(tier + 1),
                    target: UpgradeTarget::Building { index: b.id },
                });
            }
        }

        Self { buildings, upgrades }
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {}", path.display()))?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Structural checks a hand-edited catalog file must pass.
    pub fn check(&self) -> anyhow::Result<()> {
        for (i, b) in self.buildings.iter().enumerate() {
            if b.id != i {
                bail!("building '{}' has id {} at position {}", b.name, b.id, i);
            }
        }
        let mut seen = HashSet::new();
        for u in &self.upgrades {
            if !seen.insert(u.id.as_str()) {
                bail!("duplicate upgrade id '{}'", u.id);
            }
            if let UpgradeTarget::Building { index } = u.target {
                if index >= self.buildings.len() {
                    bail!("upgrade '{}' targets unknown building {}", u.id, index);
                }
            }
        }
        Ok(())
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn upgrade_count(&self) -> usize {
        self.upgrades.len()
    }

    /// Position of an upgrade in catalog order.
    pub fn upgrade_position(&self, id: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id == id)
    }

    pub fn has_upgrade(&self, id: &str) -> bool {
        self.upgrade_position(id).is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
