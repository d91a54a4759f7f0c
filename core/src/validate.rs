//! Structural invariants of a decoded snapshot.

use crate::{catalog::Catalog, snapshot::Snapshot};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid money value: {money}")]
    NegativeMoney { money: f64 },

    #[error("invalid buildings count: {found} (known: {known})")]
    TooManyBuildings { found: usize, known: usize },

    #[error("invalid upgradings count: {found} (known: {known})")]
    TooManyUpgrades { found: usize, known: usize },

    #[error("invalid manual work count: {count}")]
    NegativeManualWork { count: i64 },
}

/// Check invariants in a fixed order and report the first violation.
pub fn validate(snapshot: &Snapshot, catalog: &Catalog) -> Result<(), ValidationError> {
    if snapshot.money < 0.0 {
        return Err(ValidationError::NegativeMoney { money: snapshot.money });
    }
    let buildings = snapshot.buildings.as_ref().map_or(0, Vec::len);
    if buildings > catalog.building_count() {
        return Err(ValidationError::TooManyBuildings {
            found: buildings,
            known: catalog.building_count(),
        });
    }
    let upgrades = snapshot.upgrades.as_ref().map_or(0, Vec::len);
    if upgrades > catalog.upgrade_count() {
        return Err(ValidationError::TooManyUpgrades {
            found: upgrades,
            known: catalog.upgrade_count(),
        });
    }
    if snapshot.manual_work < 0 {
        return Err(ValidationError::NegativeManualWork { count: snapshot.manual_work });
    }
    Ok(())
}
