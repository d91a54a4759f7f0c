//! Player progress as the rest of the game sees it.
//!
//! The persistence engine only reads a `GameState` to capture a
//! snapshot, or builds a fresh one from a loaded snapshot.

use crate::{
    catalog::Catalog,
    error::{SaveError, SaveResult},
    types::{BuildingIndex, UpgradeId},
};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub money: f64,
    pub manual_work: u64,
    /// Purchase count per building, indexed by catalog position.
    pub buildings: Vec<u64>,
    pub purchased_upgrades: BTreeSet<UpgradeId>,
}

impl GameState {
    /// A brand new game: nothing earned, nothing bought.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            money: 0.0,
            manual_work: 0,
            buildings: vec![0; catalog.building_count()],
            purchased_upgrades: BTreeSet::new(),
        }
    }

    pub fn building_count(&self, index: BuildingIndex) -> SaveResult<u64> {
        self.buildings
            .get(index)
            .copied()
            .ok_or(SaveError::UnknownBuilding { index })
    }

    pub fn set_building_count(&mut self, index: BuildingIndex, count: u64) -> SaveResult<()> {
        let slot = self
            .buildings
            .get_mut(index)
            .ok_or(SaveError::UnknownBuilding { index })?;
        *slot = count;
        Ok(())
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased_upgrades.contains(id)
    }

    /// Mark an upgrade bought (or not). Ids outside the catalog are rejected.
    pub fn set_upgrade_purchased(
        &mut self,
        catalog: &Catalog,
        id: &str,
        purchased: bool,
    ) -> SaveResult<()> {
        if !catalog.has_upgrade(id) {
            return Err(SaveError::UnknownUpgrade { id: id.to_string() });
        }
        if purchased {
            self.purchased_upgrades.insert(id.to_string());
        } else {
            self.purchased_upgrades.remove(id);
        }
        Ok(())
    }
}
