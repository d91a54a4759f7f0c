//! Partial recovery: salvage what can be salvaged from a record that
//! does not decode as a whole.
//!
//! The payload is split into top-level fields whose values stay as raw
//! JSON text, and each expected field (and each element of a list field)
//! is decoded on its own. Skipped values are never interpreted, so a
//! number out of `f64` range only costs the field or element it sits in.
//! A field that fails keeps its new-game default. Extraction never fails.

use crate::{
    catalog::Catalog,
    snapshot::{Snapshot, UpgradeEntry},
};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::collections::BTreeMap;

pub(crate) type FieldMap = BTreeMap<String, Box<RawValue>>;

/// Split the top level of a payload into field name -> raw value.
pub(crate) fn field_map(bytes: &[u8]) -> Option<FieldMap> {
    match serde_json::from_slice::<FieldMap>(bytes) {
        Ok(fields) => Some(fields),
        Err(e) => {
            log::warn!("Save payload is not an object, nothing to recover: {e}");
            None
        }
    }
}

fn decode_raw<T: DeserializeOwned>(raw: &RawValue) -> serde_json::Result<T> {
    serde_json::from_str(raw.get())
}

/// Decode one field in isolation. Missing or malformed fields yield `None`.
pub(crate) fn decode_field<T: DeserializeOwned>(fields: &FieldMap, name: &str) -> Option<T> {
    let raw = fields.get(name)?;
    match decode_raw(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!("Field '{name}' is unrecoverable: {e}");
            None
        }
    }
}

/// Decode a list field element by element. Elements that fail come back
/// as `None` so the positions of their siblings hold.
pub(crate) fn decode_elements<T: DeserializeOwned>(
    fields: &FieldMap,
    name: &str,
) -> Option<Vec<Option<T>>> {
    let elements: Vec<Box<RawValue>> = decode_field(fields, name)?;
    Some(
        elements
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                decode_raw(raw)
                    .map_err(|e| log::debug!("Element {name}[{i}] is unrecoverable: {e}"))
                    .ok()
            })
            .collect(),
    )
}

/// Recovered money is only trusted when positive.
pub(crate) fn accept_money(found: Option<f64>) -> Option<f64> {
    found.filter(|m| *m > 0.0)
}

pub(crate) fn accept_manual_work(found: Option<i64>) -> Option<i64> {
    found.filter(|c| *c >= 0)
}

/// Copy non-negative counts into their slots. Positions past the end of
/// `slots` are skipped.
pub(crate) fn place_counts(slots: &mut [i64], found: &[Option<i64>]) -> usize {
    let mut placed = 0;
    for (slot, count) in slots.iter_mut().zip(found) {
        if let Some(count) = count.filter(|c| *c >= 0) {
            *slot = count;
            placed += 1;
        }
    }
    placed
}

/// Best-effort decode of a current-schema record.
pub fn extract(bytes: &[u8], catalog: &Catalog) -> Snapshot {
    let mut snapshot = Snapshot::new_game(catalog);
    let Some(fields) = field_map(bytes) else {
        return snapshot;
    };

    if let Some(money) = accept_money(decode_field(&fields, "money")) {
        log::info!("Partially recovered money from corrupted save: {money}");
        snapshot.money = money;
    }

    if let Some(found) = decode_elements::<i64>(&fields, "buildings") {
        let slots = snapshot.buildings.get_or_insert_with(Vec::new);
        let placed = place_counts(slots, &found);
        log::info!("Partially recovered {placed} building counts from corrupted save");
    }

    if let Some(found) = decode_elements::<UpgradeEntry>(&fields, "upgradings") {
        let slots = snapshot.upgrades.get_or_insert_with(Vec::new);
        let mut matched = 0;
        for entry in found.into_iter().flatten() {
            if let Some(slot) = slots.iter_mut().find(|s| s.id == entry.id) {
                slot.purchased |= entry.purchased;
                matched += 1;
            }
        }
        log::info!("Partially recovered {matched} upgrades from corrupted save");
    }

    if let Some(count) = accept_manual_work(decode_field(&fields, "manual_work")) {
        log::info!("Partially recovered manual work from corrupted save: {count}");
        snapshot.manual_work = count;
    }

    snapshot
}
