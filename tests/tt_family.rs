use flipbot::search::tt::{HashFamily, HashTable, StoreData, TableSizes};

fn entry(depth: u8, lower: i16, upper: i16) -> StoreData {
    StoreData { depth, selectivity: 0, lower, upper, best: Some(19) }
}

#[test]
fn probe_returns_what_was_stored() {
    let t = HashTable::with_capacity(64, false).unwrap();
    t.store(0xABCD, entry(8, -4, 12));
    let e = t.probe(0xABCD).expect("stored entry");
    assert_eq!(e.depth, 8);
    assert_eq!((e.lower, e.upper), (-4, 12));
    assert_eq!(e.best, Some(19));
    assert!(t.probe(0xDCBA).is_none());
}

#[test]
fn equal_depth_stores_merge_bounds() {
    let t = HashTable::with_capacity(64, false).unwrap();
    t.store(7, entry(10, -64, 6));
    t.store(7, entry(10, -2, 64));
    let e = t.probe(7).unwrap();
    assert_eq!((e.lower, e.upper), (-2, 6), "windows should intersect");
}

#[test]
fn deeper_entry_is_not_clobbered_by_shallower() {
    let t = HashTable::with_capacity(64, false).unwrap();
    t.store(7, entry(12, 2, 2));
    t.store(7, entry(4, -10, -10));
    let e = t.probe(7).unwrap();
    assert_eq!(e.depth, 12);
    assert_eq!((e.lower, e.upper), (2, 2));
}

#[test]
fn aging_eviction_prefers_oldest_when_depth_equal() {
    // One bucket of 4 ways; keys collide by construction.
    let t = HashTable::with_capacity(4, false).unwrap();
    for key in 1..=4u64 {
        t.store(key, entry(5, 0, 0));
        t.bump_generation();
    }
    t.store(99, entry(5, 0, 0));
    assert!(t.probe(1).is_none(), "oldest entry not evicted at equal depth");
    assert!(t.probe(99).is_some(), "new entry not inserted");
}

#[test]
fn same_generation_deeper_victim_survives() {
    let t = HashTable::with_capacity(4, false).unwrap();
    for key in 1..=4u64 {
        t.store(key, entry(20, 0, 0));
    }
    t.store(99, entry(3, 0, 0));
    assert!(t.probe(99).is_none(), "shallow entry should not displace deep ones");
    for key in 1..=4u64 {
        assert!(t.probe(key).is_some());
    }
}

#[test]
fn clear_empties_the_table() {
    let t = HashTable::with_capacity(64, false).unwrap();
    t.store(5, entry(6, 1, 1));
    t.clear();
    assert!(t.probe(5).is_none());
}

#[test]
fn counters_are_opt_in() {
    let silent = HashTable::with_capacity(64, false).unwrap();
    assert!(silent.stats().is_none());

    let counted = HashTable::with_capacity(64, true).unwrap();
    counted.store(1, entry(5, 0, 0));
    counted.probe(1);
    counted.probe(2);
    let (stores, probes, hits) = counted.stats().unwrap();
    assert_eq!((stores, probes, hits), (1, 2, 1));
}

#[test]
fn family_tables_are_independent() {
    let f = HashFamily::new(TableSizes::default(), false).unwrap();
    f.main.store(42, entry(9, 3, 3));
    assert!(f.pv.probe(42).is_none());
    assert!(f.shallow.probe(42).is_none());
    assert!(f.main.probe(42).is_some());
    f.clear();
    assert!(f.main.probe(42).is_none());
}

#[test]
fn from_mb_scales_the_main_table() {
    let small = TableSizes::from_mb(1);
    let big = TableSizes::from_mb(64);
    assert!(big.main > small.main);
    assert!(small.pv <= small.main);
}
