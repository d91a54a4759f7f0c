//! Legacy schema adapter.
//!
//! The previous release wrote capitalized field names and stored
//! upgrades as a positional list of purchased flags:
//!
//! ```json
//! { "Money": 12.0, "Buildings": [1, 0], "Upgradings": [true], "ManualWork": 3 }
//! ```
//!
//! Legacy records are read-only. They are turned into a current-schema
//! snapshot (ids taken from catalog position) and reconciled with the
//! current record only through the merger.

use crate::{
    catalog::Catalog,
    error::{SaveError, SaveResult},
    recovery::{
        accept_manual_work, accept_money, decode_elements, decode_field, field_map, place_counts,
    },
    snapshot::Snapshot,
};
use serde::Deserialize;

const MONEY: &str = "Money";
const BUILDINGS: &str = "Buildings";
const UPGRADES: &str = "Upgradings";
const MANUAL_WORK: &str = "ManualWork";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacySnapshot {
    #[serde(rename = "Money", default)]
    pub money: Option<f64>,
    #[serde(rename = "Buildings", default)]
    pub buildings: Option<Vec<i64>>,
    #[serde(rename = "Upgradings", default)]
    pub upgrades: Option<Vec<bool>>,
    #[serde(rename = "ManualWork", default)]
    pub manual_work: Option<i64>,
}

impl LegacySnapshot {
    /// True when no legacy field was present at all, which is how a
    /// current-schema record looks through legacy eyes.
    pub fn is_empty(&self) -> bool {
        self.money.is_none()
            && self.buildings.is_none()
            && self.upgrades.is_none()
            && self.manual_work.is_none()
    }

    pub fn to_snapshot(&self, catalog: &Catalog) -> Snapshot {
        assemble(
            catalog,
            self.money,
            self.buildings.as_ref().map(|b| b.iter().copied().map(Some).collect()),
            self.upgrades.as_ref().map(|u| u.iter().copied().map(Some).collect()),
            self.manual_work,
        )
    }
}

/// What the legacy view of a payload contributes to a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCandidate {
    pub snapshot: Snapshot,
    /// Whether any legacy field was present in the payload.
    pub found: bool,
}

pub fn decode_legacy(bytes: &[u8]) -> SaveResult<LegacySnapshot> {
    serde_json::from_slice(bytes).map_err(SaveError::Decode)
}

/// Field-by-field recovery against the legacy field names.
pub fn extract_legacy(bytes: &[u8], catalog: &Catalog) -> LegacyCandidate {
    let Some(fields) = field_map(bytes) else {
        return LegacyCandidate { snapshot: Snapshot::new_game(catalog), found: false };
    };
    let found = [MONEY, BUILDINGS, UPGRADES, MANUAL_WORK]
        .iter()
        .any(|name| fields.contains_key(*name));
    let snapshot = assemble(
        catalog,
        decode_field(&fields, MONEY),
        decode_elements(&fields, BUILDINGS),
        decode_elements(&fields, UPGRADES),
        decode_field(&fields, MANUAL_WORK),
    );
    LegacyCandidate { snapshot, found }
}

/// Produce the migration candidate for a payload: a clean legacy decode
/// when possible, partial legacy extraction otherwise. Never fails.
pub fn migration_candidate(bytes: &[u8], catalog: &Catalog) -> LegacyCandidate {
    match decode_legacy(bytes) {
        Ok(legacy) => LegacyCandidate {
            found: !legacy.is_empty(),
            snapshot: legacy.to_snapshot(catalog),
        },
        Err(e) => {
            log::warn!("Legacy decode failed, extracting legacy fields one by one: {e}");
            extract_legacy(bytes, catalog)
        }
    }
}

fn assemble(
    catalog: &Catalog,
    money: Option<f64>,
    buildings: Option<Vec<Option<i64>>>,
    upgrades: Option<Vec<Option<bool>>>,
    manual_work: Option<i64>,
) -> Snapshot {
    let mut snapshot = Snapshot::new_game(catalog);

    if let Some(money) = accept_money(money) {
        snapshot.money = money;
    }
    if let Some(found) = buildings {
        place_counts(snapshot.buildings.get_or_insert_with(Vec::new), &found);
    }
    if let Some(flags) = upgrades {
        // Legacy flags line up with catalog order.
        let slots = snapshot.upgrades.get_or_insert_with(Vec::new);
        for (slot, flag) in slots.iter_mut().zip(flags) {
            if let Some(flag) = flag {
                slot.purchased = flag;
            }
        }
    }
    if let Some(count) = accept_manual_work(manual_work) {
        snapshot.manual_work = count;
    }

    snapshot
}
