//! Monotonic merge of two snapshots.
//!
//! RULE: merging never loses progress that either side remembers.
//! Money, manual work and every building count take the maximum; an
//! upgrade purchased on either side stays purchased.

use crate::snapshot::{Snapshot, UpgradeEntry};

/// Fold `secondary` into `primary` in place.
///
/// The merged upgrade list holds each id once, in order of first
/// appearance: the primary's entries first, then ids only the secondary
/// knows. Duplicate ids on either side collapse into one entry.
pub fn merge(primary: &mut Snapshot, secondary: &Snapshot) {
    primary.money = primary.money.max(secondary.money);
    primary.manual_work = primary.manual_work.max(secondary.manual_work);

    // The shorter list counts as zero-padded, on either side.
    if primary.buildings.is_some() || secondary.buildings.is_some() {
        let theirs = secondary.buildings.as_deref().unwrap_or(&[]);
        let ours = primary.buildings.get_or_insert_with(Vec::new);
        ours.resize(ours.len().max(theirs.len()), 0);
        for (i, mine) in ours.iter_mut().enumerate() {
            *mine = (*mine).max(theirs.get(i).copied().unwrap_or(0));
        }
    }

    if primary.upgrades.is_some() || secondary.upgrades.is_some() {
        let ours = primary.upgrades.take().unwrap_or_default();
        let mut folded: Vec<UpgradeEntry> = Vec::with_capacity(ours.len());
        for entry in ours.iter().chain(secondary.upgrades.iter().flatten()) {
            match folded.iter_mut().find(|u| u.id == entry.id) {
                Some(existing) => existing.purchased |= entry.purchased,
                None => folded.push(entry.clone()),
            }
        }
        primary.upgrades = Some(folded);
    }
}

/// Non-mutating form of [`merge`].
pub fn merged(mut primary: Snapshot, secondary: &Snapshot) -> Snapshot {
    merge(&mut primary, secondary);
    primary
}
