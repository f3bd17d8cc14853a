//! Transposition table family: Main, PV and Shallow tables.
//!
//! Consistency contract: the tables are shared by all search workers
//! under striped locking, and probes are a performance heuristic only.
//! A probe may miss an entry that was just stored, and a stale bound can
//! only cost re-search work: the enclosing alpha-beta search validates
//! every cached bound against its live window, so no table outcome can
//! make a result incorrect.

use crate::board::Square;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot allocate a hash table of {0} entries")]
pub struct AllocationError(pub usize);

/// Cached search result for one position.
///
/// Invariant: `lower <= upper`. The bounds certify a search of
/// `depth` plies at the stored selectivity; shallower or more selective
/// queries may reuse them, deeper ones may only use `best` for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEntry {
    pub key: u64,
    pub depth: u8,
    pub selectivity: u8,
    pub lower: i16,
    pub upper: i16,
    pub best: Option<Square>,
    pub generation: u8,
}

/// Payload for a store; the table manages generations itself.
#[derive(Debug, Clone, Copy)]
pub struct StoreData {
    pub depth: u8,
    pub selectivity: u8,
    pub lower: i16,
    pub upper: i16,
    pub best: Option<Square>,
}

const WAYS: usize = 4;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<HashEntry>; WAYS],
}

#[derive(Default)]
struct Counters {
    stores: AtomicU64,
    probes: AtomicU64,
    hits: AtomicU64,
}

pub struct HashTable {
    buckets: Vec<Mutex<Bucket>>,
    generation: AtomicU8,
    counters: Option<Counters>,
}

impl HashTable {
    /// Build a table with at least `entries` slots. Fails with
    /// [`AllocationError`] instead of aborting so the caller can report
    /// before exiting.
    pub fn with_capacity(entries: usize, count_stats: bool) -> Result<Self, AllocationError> {
        let n_buckets = entries.max(WAYS).div_ceil(WAYS);
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(n_buckets)
            .map_err(|_| AllocationError(entries))?;
        buckets.resize_with(n_buckets, || Mutex::new(Bucket::default()));
        Ok(HashTable {
            buckets,
            generation: AtomicU8::new(0),
            counters: count_stats.then(Counters::default),
        })
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len()
    }

    /// Thread-safe lookup. A miss is a normal outcome, not an error.
    pub fn probe(&self, key: u64) -> Option<HashEntry> {
        if let Some(c) = &self.counters {
            c.probes.fetch_add(1, Ordering::Relaxed);
        }
        let bucket = self.buckets[self.bucket_index(key)].lock().unwrap();
        for slot in &bucket.slots {
            if let Some(e) = slot {
                if e.key == key {
                    if let Some(c) = &self.counters {
                        c.hits.fetch_add(1, Ordering::Relaxed);
                    }
                    return Some(*e);
                }
            }
        }
        None
    }

    /// Thread-safe insert/update.
    ///
    /// Same-key stores at equal depth and selectivity merge bounds;
    /// deeper stores overwrite. Eviction picks the oldest-generation,
    /// shallowest victim and never replaces a deeper entry of the
    /// current generation with a shallower one.
    pub fn store(&self, key: u64, data: StoreData) {
        debug_assert!(data.lower <= data.upper);
        if let Some(c) = &self.counters {
            c.stores.fetch_add(1, Ordering::Relaxed);
        }
        let generation = self.generation.load(Ordering::Relaxed);
        let entry = HashEntry {
            key,
            depth: data.depth,
            selectivity: data.selectivity,
            lower: data.lower,
            upper: data.upper,
            best: data.best,
            generation,
        };
        let mut bucket = self.buckets[self.bucket_index(key)].lock().unwrap();

        for slot in bucket.slots.iter_mut() {
            if let Some(cur) = slot {
                if cur.key != key {
                    continue;
                }
                if (entry.depth, entry.selectivity) == (cur.depth, cur.selectivity) {
                    cur.lower = cur.lower.max(entry.lower);
                    cur.upper = cur.upper.min(entry.upper);
                    if cur.lower > cur.upper {
                        // Bounds from different subtree shapes can
                        // disagree after a window change; trust the
                        // newer pair.
                        cur.lower = entry.lower;
                        cur.upper = entry.upper;
                    }
                    if entry.best.is_some() {
                        cur.best = entry.best;
                    }
                    cur.generation = generation;
                } else if entry.depth >= cur.depth {
                    *slot = Some(entry);
                }
                return;
            }
        }
        for slot in bucket.slots.iter_mut() {
            if slot.is_none() {
                *slot = Some(entry);
                return;
            }
        }
        // Eviction: oldest generation first, then shallowest.
        let mut victim = 0usize;
        let mut victim_age = 0u8;
        let mut victim_depth = u8::MAX;
        for (i, slot) in bucket.slots.iter().enumerate() {
            if let Some(cur) = *slot {
                let age = cur_age(generation, cur.generation);
                if age > victim_age || (age == victim_age && cur.depth < victim_depth) {
                    victim_age = age;
                    victim_depth = cur.depth;
                    victim = i;
                }
            }
        }
        if victim_age == 0 && victim_depth > entry.depth {
            return;
        }
        bucket.slots[victim] = Some(entry);
    }

    /// Advance the replacement generation (once per deepening
    /// iteration).
    pub fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for b in &self.buckets {
            *b.lock().unwrap() = Bucket::default();
        }
    }

    /// (stores, probes, hits) when counting is enabled.
    pub fn stats(&self) -> Option<(u64, u64, u64)> {
        self.counters.as_ref().map(|c| {
            (
                c.stores.load(Ordering::Relaxed),
                c.probes.load(Ordering::Relaxed),
                c.hits.load(Ordering::Relaxed),
            )
        })
    }
}

#[inline]
fn cur_age(now: u8, stored: u8) -> u8 {
    now.wrapping_sub(stored)
}

/// Sizing for the three tables, in entries.
#[derive(Debug, Clone, Copy)]
pub struct TableSizes {
    pub main: usize,
    pub pv: usize,
    pub shallow: usize,
}

impl Default for TableSizes {
    fn default() -> Self {
        TableSizes { main: 1 << 18, pv: 1 << 12, shallow: 1 << 14 }
    }
}

impl TableSizes {
    /// Rough sizing from a memory budget: ~48 bytes per entry, most of
    /// it for the main table.
    pub fn from_mb(mb: usize) -> Self {
        let entries = (mb.max(1) * 1024 * 1024 / 48).max(4 * WAYS);
        TableSizes {
            main: entries,
            pv: (entries / 64).max(WAYS),
            shallow: (entries / 16).max(WAYS),
        }
    }
}

/// The three independent caches shared by every search task.
pub struct HashFamily {
    pub main: HashTable,
    pub pv: HashTable,
    pub shallow: HashTable,
}

/// Depth at or below which the shallow table is used.
pub const SHALLOW_DEPTH: u8 = 4;

impl HashFamily {
    pub fn new(sizes: TableSizes, count_stats: bool) -> Result<Self, AllocationError> {
        Ok(HashFamily {
            main: HashTable::with_capacity(sizes.main, count_stats)?,
            pv: HashTable::with_capacity(sizes.pv, count_stats)?,
            shallow: HashTable::with_capacity(sizes.shallow, count_stats)?,
        })
    }

    pub fn bump_generation(&self) {
        self.main.bump_generation();
        self.pv.bump_generation();
        self.shallow.bump_generation();
    }

    pub fn clear(&self) {
        self.main.clear();
        self.pv.clear();
        self.shallow.clear();
    }
}
