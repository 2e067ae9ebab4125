//! Signature-keyed cache of composed outfit images
//!
//! Each signature maps to a slot holding a once-cell. The map lock is only
//! held long enough to find or create a slot; building happens on the cell,
//! so a lookup never waits behind the build of an unrelated signature while
//! concurrent requests for the same signature wait for the one build in
//! flight and then share its result.
//!
//! A failed build caches nothing: its slot is dropped unless another caller
//! is waiting on it, and the next request tries again.
//!
//! By default entries live as long as the cache. With a capacity set, the
//! least recently used entries are dropped once the number of built entries
//! exceeds it. Readers holding an evicted image keep it alive; a later
//! request for the same signature builds it again.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::provider::SharedImage;

#[derive(Debug, Default)]
struct Slot {
    cell: OnceCell<SharedImage>,
    last_used: AtomicU64,
}

/// Counters describing cache behavior since creation (or the last clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Built entries currently resident
    pub entries: usize,
    /// Requests answered without running a builder
    pub hits: u64,
    /// Builder invocations
    pub builds: u64,
    /// Builder invocations that returned an error
    pub failures: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
}

/// Thread-safe cache guaranteeing at most one build per resident signature.
#[derive(Debug, Default)]
pub struct OutfitCache {
    slots: RwLock<HashMap<String, Arc<Slot>>>,
    capacity: Option<NonZeroUsize>,
    clock: AtomicU64,
    hits: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
    evictions: AtomicU64,
}

impl OutfitCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `capacity` built entries.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self { capacity: Some(capacity), ..Self::default() }
    }

    /// The entry limit, if bounded.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Return the image cached under `signature`, running `build` to create
    /// it if there is none.
    ///
    /// For a given resident signature `build` runs at most once, even when
    /// many threads ask at the same time; all of them receive the same
    /// `Arc`. If `build` fails, the error goes to the caller that ran it and
    /// nothing is cached.
    pub fn get_or_build<E, F>(&self, signature: &str, build: F) -> Result<SharedImage, E>
    where
        F: FnOnce() -> Result<SharedImage, E>,
    {
        let slot = self.slot(signature);

        if let Some(image) = slot.cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.touch(&slot);
            return Ok(Arc::clone(image));
        }

        let mut built = false;
        let result = slot.cell.get_or_try_init(|| {
            built = true;
            self.builds.fetch_add(1, Ordering::Relaxed);
            log::debug!("building {}", signature);
            build()
        });

        let image = match result {
            Ok(image) => Arc::clone(image),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.discard_if_unused(signature, &slot);
                return Err(e);
            }
        };

        self.touch(&slot);
        if built {
            self.evict_over_capacity(signature);
        } else {
            // Waited on another caller's build.
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(image)
    }

    /// Look up a built entry without building.
    pub fn get(&self, signature: &str) -> Option<SharedImage> {
        let slot = self.slots.read().get(signature).cloned()?;
        let image = slot.cell.get().cloned()?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.touch(&slot);
        Some(image)
    }

    /// Whether a built entry exists for `signature`.
    pub fn contains(&self, signature: &str) -> bool {
        self.slots.read().get(signature).is_some_and(|slot| slot.cell.get().is_some())
    }

    /// Number of built entries.
    pub fn len(&self) -> usize {
        self.slots.read().values().filter(|slot| slot.cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.slots.write().clear();
        for counter in [&self.hits, &self.builds, &self.failures, &self.evictions] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Find or create the slot for a signature.
    fn slot(&self, signature: &str) -> Arc<Slot> {
        if let Some(slot) = self.slots.read().get(signature) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(signature.to_string()).or_default())
    }

    /// Remove an unbuilt slot after a failed build unless another caller
    /// still holds it (a waiter will retry the build on that slot).
    fn discard_if_unused(&self, signature: &str, slot: &Arc<Slot>) {
        let mut slots = self.slots.write();
        let unused = slots.get(signature).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && current.cell.get().is_none() && Arc::strong_count(slot) == 2
        });
        if unused {
            slots.remove(signature);
        }
    }

    fn touch(&self, slot: &Slot) {
        let now = self.clock.fetch_add(1, Ordering::Relaxed);
        slot.last_used.store(now, Ordering::Relaxed);
    }

    /// Drop least recently used built entries, never `keep`, until within
    /// capacity.
    fn evict_over_capacity(&self, keep: &str) {
        let Some(capacity) = self.capacity else {
            return;
        };

        let mut slots = self.slots.write();
        loop {
            let built = slots.values().filter(|slot| slot.cell.get().is_some()).count();
            if built <= capacity.get() {
                break;
            }

            let victim = slots
                .iter()
                .filter(|(key, slot)| key.as_str() != keep && slot.cell.get().is_some())
                .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());

            match victim {
                Some(key) => {
                    log::debug!("evicting {}", key);
                    slots.remove(&key);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
    }
}
