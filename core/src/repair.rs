//! Best-effort correction of a snapshot that failed validation.
//!
//! Only negative values are treated as corruption. Counts are acquired
//! monotonically, so an oversized list is kept as-is and any residual
//! validation failure is logged, never escalated.

use crate::{
    catalog::Catalog,
    snapshot::Snapshot,
    validate::{validate, ValidationError},
};

pub fn repair(mut snapshot: Snapshot, cause: &ValidationError, catalog: &Catalog) -> Snapshot {
    log::info!("Fixing invalid save: {cause}");
    let defaults = Snapshot::new_game(catalog);

    if snapshot.money < 0.0 {
        snapshot.money = defaults.money;
    }

    if snapshot.manual_work < 0 {
        snapshot.manual_work = defaults.manual_work;
    }

    match snapshot.buildings.as_mut() {
        None => snapshot.buildings = defaults.buildings.clone(),
        Some(buildings) => {
            for count in buildings.iter_mut().filter(|c| **c < 0) {
                *count = 0;
            }
        }
    }

    snapshot.upgrades = match snapshot.upgrades.take() {
        None => defaults.upgrades,
        Some(found) => {
            // Flags carry over onto the full default list, position for
            // position. An entry whose id the catalog knows lands on that
            // id's slot instead, which is the same slot for any list that
            // was written in catalog order.
            let mut fixed = defaults.upgrades.unwrap_or_default();
            for (i, entry) in found.iter().enumerate().take(fixed.len()) {
                let slot = catalog.upgrade_position(&entry.id).unwrap_or(i);
                fixed[slot].purchased |= entry.purchased;
            }
            Some(fixed)
        }
    };

    if let Err(residual) = validate(&snapshot, catalog) {
        log::warn!("Still have validation errors after fixing: {residual}");
    }
    snapshot
}
