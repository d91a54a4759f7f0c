//! Merger tests.
//!
//! Tests cover: the monotonic laws (never below either input, idempotent,
//! commutative, associative) over seeded random snapshots, plus the
//! concrete zero-padding, upgrade-union and duplicate-id cases.

use clicker_core::{
    catalog::Catalog,
    merge::{merge, merged},
    snapshot::{Snapshot, UpgradeEntry},
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

fn random_snapshot(rng: &mut Pcg64Mcg, catalog: &Catalog) -> Snapshot {
    let buildings = if rng.gen_bool(0.9) {
        let n = rng.gen_range(0..=10);
        Some((0..n).map(|_| rng.gen_range(-3..50)).collect())
    } else {
        None
    };
    let upgrades = if rng.gen_bool(0.9) {
        let mut entries: Vec<UpgradeEntry> = catalog
            .upgrades
            .iter()
            .filter(|_| rng.gen_bool(0.6))
            .map(|u| UpgradeEntry { id: u.id.clone(), purchased: false })
            .collect();
        if rng.gen_bool(0.2) {
            entries.push(UpgradeEntry { id: "retired_0".into(), purchased: false });
        }
        for e in entries.iter_mut() {
            e.purchased = rng.gen_bool(0.4);
        }
        Some(entries)
    } else {
        None
    };
    Snapshot {
        money: rng.gen_range(-1_000..1_000_000) as f64 / 100.0,
        buildings,
        upgrades,
        manual_work: rng.gen_range(-5..500),
    }
}

fn pairs(seed: u64, n: usize) -> Vec<(Snapshot, Snapshot)> {
    let catalog = Catalog::standard();
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    (0..n)
        .map(|_| (random_snapshot(&mut rng, &catalog), random_snapshot(&mut rng, &catalog)))
        .collect()
}

fn count_at(s: &Snapshot, i: usize) -> i64 {
    s.buildings.as_ref().and_then(|b| b.get(i)).copied().unwrap_or(0)
}

#[test]
fn scenario_d_element_wise_max() {
    let a = Snapshot { buildings: Some(vec![5, 3]), ..Snapshot::default() };
    let b = Snapshot { buildings: Some(vec![2, 9]), ..Snapshot::default() };
    assert_eq!(merged(a, &b).buildings, Some(vec![5, 9]));
}

#[test]
fn shorter_list_is_zero_padded() {
    let a = Snapshot { buildings: Some(vec![1]), ..Snapshot::default() };
    let b = Snapshot { buildings: Some(vec![0, 4, 6]), ..Snapshot::default() };
    assert_eq!(merged(a.clone(), &b).buildings, Some(vec![1, 4, 6]));
    assert_eq!(merged(b, &a).buildings, Some(vec![1, 4, 6]));
}

#[test]
fn purchase_is_never_reversed() {
    let a = Snapshot {
        upgrades: Some(vec![
            UpgradeEntry { id: "0_0".into(), purchased: true },
            UpgradeEntry { id: "0_1".into(), purchased: false },
        ]),
        ..Snapshot::default()
    };
    let b = Snapshot {
        upgrades: Some(vec![
            UpgradeEntry { id: "0_0".into(), purchased: false },
            UpgradeEntry { id: "1_0".into(), purchased: true },
        ]),
        ..Snapshot::default()
    };

    let mut out = a.clone();
    merge(&mut out, &b);

    let flags = out.upgrade_flags();
    assert_eq!(flags.get("0_0"), Some(&true));
    assert_eq!(flags.get("0_1"), Some(&false));
    assert_eq!(flags.get("1_0"), Some(&true));
    // Primary order first, then ids only the secondary knew.
    let ids: Vec<_> = out.upgrades.unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec!["0_0", "0_1", "1_0"]);
}

#[test]
fn duplicate_ids_collapse_into_one_entry() {
    let a = Snapshot {
        upgrades: Some(vec![
            UpgradeEntry { id: "0_0".into(), purchased: false },
            UpgradeEntry { id: "0_1".into(), purchased: false },
            UpgradeEntry { id: "0_0".into(), purchased: true },
        ]),
        ..Snapshot::default()
    };
    let expected = Snapshot {
        upgrades: Some(vec![
            UpgradeEntry { id: "0_0".into(), purchased: true },
            UpgradeEntry { id: "0_1".into(), purchased: false },
        ]),
        ..Snapshot::default()
    };

    let once = merged(a.clone(), &a);
    assert_eq!(once, expected);
    assert_eq!(merged(once.clone(), &once), once);
    assert_eq!(merged(a, &Snapshot::default()), expected);
}

#[test]
fn merge_never_regresses_either_input() {
    for (a, b) in pairs(0x5EED_0001, 500) {
        let out = merged(a.clone(), &b);

        assert!(out.money >= a.money.max(b.money));
        assert!(out.manual_work >= a.manual_work.max(b.manual_work));

        let len = out.buildings.as_ref().map_or(0, Vec::len);
        for i in 0..len {
            assert!(
                count_at(&out, i) >= count_at(&a, i).max(count_at(&b, i)),
                "building {i} regressed: {:?} + {:?} -> {:?}",
                a.buildings, b.buildings, out.buildings
            );
        }

        let flags = out.upgrade_flags();
        for (id, purchased) in a.upgrade_flags().into_iter().chain(b.upgrade_flags()) {
            if purchased {
                assert_eq!(flags.get(id), Some(&true), "purchase of {id} was lost");
            }
        }
    }
}

#[test]
fn merge_is_idempotent() {
    for (a, _) in pairs(0x5EED_0002, 500) {
        assert_eq!(merged(a.clone(), &a), a);
    }
}

#[test]
fn merge_is_commutative() {
    // Upgrade lists are compared as id -> purchased maps; list order
    // follows whichever side was primary.
    for (a, b) in pairs(0x5EED_0003, 500) {
        let ab = merged(a.clone(), &b);
        let ba = merged(b.clone(), &a);
        assert_eq!(ab.money, ba.money);
        assert_eq!(ab.manual_work, ba.manual_work);
        assert_eq!(ab.buildings, ba.buildings);
        assert_eq!(ab.upgrade_flags(), ba.upgrade_flags());
    }
}

#[test]
fn merge_is_associative() {
    let catalog = Catalog::standard();
    let mut rng = Pcg64Mcg::seed_from_u64(0x5EED_0004);
    for _ in 0..300 {
        let a = random_snapshot(&mut rng, &catalog);
        let b = random_snapshot(&mut rng, &catalog);
        let c = random_snapshot(&mut rng, &catalog);

        let left = merged(merged(a.clone(), &b), &c);
        let right = merged(a, &merged(b, &c));
        assert_eq!(left.money, right.money);
        assert_eq!(left.manual_work, right.manual_work);
        assert_eq!(left.buildings, right.buildings);
        assert_eq!(left.upgrade_flags(), right.upgrade_flags());
    }
}
