//! Snapshot: the serializable projection of a `GameState`.
//!
//! Field names on the wire are a compatibility contract with every
//! save ever written:
//!
//! ```json
//! { "money": 1.5, "buildings": [3, 0], "manual_work": 12,
//!   "upgradings": [{"id": "0_0", "is_purchased": true}] }
//! ```
//!
//! Counts are signed so that corrupt negative values survive decoding
//! and reach the repairer instead of failing the whole record.

use crate::{catalog::Catalog, state::GameState, types::UpgradeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEntry {
    pub id: UpgradeId,
    #[serde(rename = "is_purchased")]
    pub purchased: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub money: f64,
    /// Index = building position in the catalog. `None` when the field
    /// was missing from the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildings: Option<Vec<i64>>,
    #[serde(default, rename = "upgradings", skip_serializing_if = "Option::is_none")]
    pub upgrades: Option<Vec<UpgradeEntry>>,
    #[serde(default)]
    pub manual_work: i64,
}

impl Snapshot {
    /// Project a game state onto the wire shape. Every catalog upgrade is
    /// listed, purchased or not.
    pub fn capture(state: &GameState, catalog: &Catalog) -> Self {
        let money = if state.money.is_finite() {
            state.money
        } else {
            log::warn!("Non-finite money {} cannot be saved, storing 0", state.money);
            0.0
        };
        Self {
            money,
            buildings: Some(
                state
                    .buildings
                    .iter()
                    .map(|&c| i64::try_from(c).unwrap_or(i64::MAX))
                    .collect(),
            ),
            upgrades: Some(
                catalog
                    .upgrades
                    .iter()
                    .map(|u| UpgradeEntry {
                        id: u.id.clone(),
                        purchased: state.is_purchased(&u.id),
                    })
                    .collect(),
            ),
            manual_work: i64::try_from(state.manual_work).unwrap_or(i64::MAX),
        }
    }

    /// The snapshot of a brand new game.
    pub fn new_game(catalog: &Catalog) -> Self {
        Self::capture(&GameState::new(catalog), catalog)
    }

    /// Build a fresh game state from this snapshot.
    ///
    /// Entries the state cannot hold (negative counts, positions past the
    /// catalog, purchased ids the catalog does not know) are dropped.
    /// Returns the state and how many entries were dropped.
    pub fn to_game_state(&self, catalog: &Catalog) -> (GameState, usize) {
        let mut state = GameState::new(catalog);
        let mut dropped = 0;

        if self.money >= 0.0 {
            state.money = self.money;
        } else {
            log::warn!("Dropping invalid money {}", self.money);
            dropped += 1;
        }

        match u64::try_from(self.manual_work) {
            Ok(count) => state.manual_work = count,
            Err(_) => {
                log::warn!("Dropping invalid manual work count {}", self.manual_work);
                dropped += 1;
            }
        }

        for (i, &count) in self.buildings.iter().flatten().enumerate() {
            let applied = u64::try_from(count)
                .map_err(|_| ())
                .and_then(|c| state.set_building_count(i, c).map_err(|_| ()));
            if applied.is_err() {
                log::warn!("Dropping building entry [{i}] = {count}");
                dropped += 1;
            }
        }

        for entry in self.upgrades.iter().flatten() {
            if !entry.purchased {
                continue;
            }
            if let Err(e) = state.set_upgrade_purchased(catalog, &entry.id, true) {
                log::warn!("Dropping upgrade entry: {e}");
                dropped += 1;
            }
        }

        (state, dropped)
    }

    /// Purchased flag per upgrade id; an id listed twice counts as
    /// purchased if any of its entries is.
    pub fn upgrade_flags(&self) -> BTreeMap<&str, bool> {
        let mut flags = BTreeMap::new();
        for u in self.upgrades.iter().flatten() {
            *flags.entry(u.id.as_str()).or_insert(false) |= u.purchased;
        }
        flags
    }
}
