//! Memoization cache in front of the aggregation engine.
//!
//! The cache is injectable rather than ambient: hosts own an
//! [`AggregateCache`], share it between widgets, and clear it when they see
//! fit. Entries are never proactively invalidated; staleness is bounded only
//! by the `data_version` component of the key, which hosts should back with a
//! monotonic version counter (a transaction count works as a cruder proxy,
//! with same-count edits as the accepted blind spot).

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, AggregateResult};
use crate::config::AnalyticsConfig;
use crate::ledger::{Budget, Category, Transaction};
use crate::period::PeriodKind;

/// Composite key for one aggregate view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: PeriodKind,
    pub reference: NaiveDate,
    /// Normalized filter: `None` for "no filter" (an empty set never appears).
    pub filter: Option<BTreeSet<Uuid>>,
    /// Host-supplied data generation; keys with differing versions never
    /// collide.
    pub data_version: u64,
}

impl CacheKey {
    pub fn new(
        kind: PeriodKind,
        reference: NaiveDate,
        filter: Option<&BTreeSet<Uuid>>,
        data_version: u64,
    ) -> Self {
        Self {
            kind,
            reference,
            filter: filter.filter(|set| !set.is_empty()).cloned(),
            data_version,
        }
    }
}

struct CacheEntry {
    value: Arc<AggregateResult>,
    last_used: u64,
}

struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    tick: u64,
}

/// Bounded, mutex-guarded LRU over aggregate results. Results are shared via
/// `Arc`, so hits hand out cheap clones of immutable snapshots.
pub struct AggregateCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl AggregateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
        }
    }

    pub fn with_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<AggregateResult>> {
        let mut inner = self.lock();
        inner.tick += 1;
        let tick = inner.tick;
        inner.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            Arc::clone(&entry.value)
        })
    }

    pub fn put(&self, key: CacheKey, value: Arc<AggregateResult>) {
        let mut inner = self.lock();
        inner.tick += 1;
        let tick = inner.tick;
        if inner.entries.len() >= self.capacity && !inner.entries.contains_key(&key) {
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                inner.entries.remove(&oldest);
                tracing::trace!(?oldest, "evicted least recently used aggregate");
            }
        }
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                last_used: tick,
            },
        );
    }

    /// Returns the cached result for `key`, computing and storing it on a
    /// miss. Concurrent misses for the same key may compute more than once;
    /// the last write wins, which is harmless for identical inputs.
    pub fn get_or_compute(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> AggregateResult,
    ) -> Arc<AggregateResult> {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = Arc::new(compute());
        self.put(key, Arc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Memoized front of [`aggregate`]: one rendering cycle hitting the same
/// (period, filter, version) tuple from several widgets computes once.
#[allow(clippy::too_many_arguments)]
pub fn aggregate_cached(
    cache: &AggregateCache,
    transactions: &[Transaction],
    categories: &[Category],
    budgets: &[Budget],
    kind: PeriodKind,
    reference: NaiveDate,
    filter: Option<&BTreeSet<Uuid>>,
    config: &AnalyticsConfig,
    data_version: u64,
) -> Arc<AggregateResult> {
    let key = CacheKey::new(kind, reference, filter, data_version);
    cache.get_or_compute(key, || {
        aggregate(
            transactions,
            categories,
            budgets,
            kind,
            reference,
            filter,
            config,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{current_period, PeriodRange};

    fn dummy_result(reference: NaiveDate) -> AggregateResult {
        let period: PeriodRange = current_period(PeriodKind::Month, reference);
        AggregateResult {
            period,
            total_income: 0.0,
            total_expenses: 0.0,
            net_flow: 0.0,
            category_summaries: Vec::new(),
            daily_series: Vec::new(),
            expense_chart: Vec::new(),
            income_chart: Vec::new(),
        }
    }

    fn key_for(day: u32, version: u64) -> CacheKey {
        CacheKey::new(
            PeriodKind::Month,
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            None,
            version,
        )
    }

    #[test]
    fn get_or_compute_computes_once_per_key() {
        let cache = AggregateCache::new(4);
        let reference = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_compute(key_for(15, 1), || {
                calls += 1;
                dummy_result(reference)
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn differing_data_versions_miss() {
        let cache = AggregateCache::new(4);
        let reference = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        cache.put(key_for(15, 1), Arc::new(dummy_result(reference)));
        assert!(cache.get(&key_for(15, 1)).is_some());
        assert!(cache.get(&key_for(15, 2)).is_none());
    }

    #[test]
    fn eviction_drops_the_least_recently_used_entry() {
        let cache = AggregateCache::new(2);
        let reference = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        cache.put(key_for(1, 1), Arc::new(dummy_result(reference)));
        cache.put(key_for(2, 1), Arc::new(dummy_result(reference)));
        // Touch the first entry so the second becomes the eviction victim.
        assert!(cache.get(&key_for(1, 1)).is_some());
        cache.put(key_for(3, 1), Arc::new(dummy_result(reference)));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key_for(1, 1)).is_some());
        assert!(cache.get(&key_for(2, 1)).is_none());
        assert!(cache.get(&key_for(3, 1)).is_some());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = AggregateCache::new(2);
        let reference = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        cache.put(key_for(1, 1), Arc::new(dummy_result(reference)));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_filter_normalizes_to_no_filter() {
        let empty = BTreeSet::new();
        let key = CacheKey::new(
            PeriodKind::Week,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Some(&empty),
            1,
        );
        assert!(key.filter.is_none());
    }
}
