//! LRU cache of evaluated address points.

use crate::{
    config::DeriverConfig, types::Stem, Address32, EvaluatedAddressPoint, KeyError,
    TreeKeyDeriver,
};
use parking_lot::Mutex;
use schnellru::{ByLength, LruMap};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, trace};

/// Hit and miss counters of a [`PointCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Keeps the most recently used [`EvaluatedAddressPoint`]s.
///
/// Points are computed outside the lock. Two threads missing on the same
/// address may both evaluate it; the results are identical, so the second
/// insert is harmless.
pub struct PointCache {
    deriver: TreeKeyDeriver,
    points: Mutex<LruMap<Address32, EvaluatedAddressPoint>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for PointCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointCache")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl PointCache {
    /// An empty cache holding at most `capacity` points.
    pub fn new(deriver: TreeKeyDeriver, capacity: u32) -> Self {
        debug!(capacity, "created evaluated address point cache");
        Self {
            deriver,
            points: Mutex::new(LruMap::new(ByLength::new(capacity))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache and deriver built from `config`.
    pub fn from_config(config: &DeriverConfig) -> Result<Self, KeyError> {
        let deriver = TreeKeyDeriver::with_config(config)?;
        Ok(Self::new(deriver, config.point_cache_capacity))
    }

    /// The deriver used on misses.
    pub fn deriver(&self) -> &TreeKeyDeriver {
        &self.deriver
    }

    /// The evaluated point of `address`, computed on a miss.
    pub fn get(&self, address: &Address32) -> EvaluatedAddressPoint {
        if let Some(point) = self.points.lock().get(address) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(address = %address.0, "point cache hit");
            return *point;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(address = %address.0, "point cache miss");
        let point = self.deriver.evaluate_address_point(address);
        self.points.lock().insert(*address, point);
        point
    }

    /// Stem of the header page of `address`.
    pub fn get_stem(&self, address: &Address32) -> Stem {
        self.deriver
            .version_key_with_evaluated_address(&self.get(address))
            .stem()
    }

    /// Hits and misses since creation.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached points.
    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    /// Whether no point is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached point. Counters are kept.
    pub fn clear(&self) {
        self.points.lock().clear();
        debug!("cleared evaluated address point cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn address(byte: u8) -> Address32 {
        Address32::from([byte; 32])
    }

    #[test]
    fn caches_evaluations() {
        let cache = PointCache::new(TreeKeyDeriver::new(), 8);
        let first = cache.get(&address(1));
        let second = cache.get(&address(1));

        assert_eq!(first, second);
        assert_eq!(first, cache.deriver().evaluate_address_point(&address(1)));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = PointCache::new(TreeKeyDeriver::new(), 2);
        cache.get(&address(1));
        cache.get(&address(2));
        cache.get(&address(1));
        cache.get(&address(3));
        assert_eq!(cache.len(), 2);

        // address 2 was evicted, address 1 is still there
        cache.get(&address(1));
        cache.get(&address(2));
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 4 });
    }

    #[test]
    fn stem_matches_direct_derivation() {
        let cache = PointCache::new(TreeKeyDeriver::new(), 4);
        let stem = cache.get_stem(&address(9));
        assert_eq!(stem, TreeKeyDeriver::new().version_key(&address(9)).stem());
    }

    #[test]
    fn clear_keeps_counters() {
        let cache = PointCache::from_config(&DeriverConfig::default()).unwrap();
        cache.get(&address(5));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn concurrent_readers_agree() {
        let cache = Arc::new(PointCache::new(TreeKeyDeriver::new(), 16));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || (0..4u8).map(|i| cache.get(&address(i))).collect::<Vec<_>>())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results[1..] {
            assert_eq!(result, &results[0]);
        }
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 16);
        assert_eq!(cache.len(), 4);
    }
}
