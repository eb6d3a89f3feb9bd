//! Span Cache - expansion results held between gossip intake and consensus handling.
//!
//! Many intake threads insert; the single handle thread takes. Entries are
//! single use and the cache never evicts to make room.

use super::accessor::{TxnAccessor, TxnRef};
use super::expansion::ExpansionOutcome;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A cached expansion for one transaction.
#[derive(Clone, Debug)]
pub struct CachedSpan {
    pub accessor: Arc<TxnAccessor>,
    pub outcome: ExpansionOutcome,
    /// Insertion time, ms since the epoch.
    pub cached_at: u64,
}

/// Result of [`SpanCache::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheInsert {
    Inserted,
    /// An entry for the same transaction is already waiting.
    Duplicate,
    /// The cache is full; nothing was stored.
    AtCapacity,
}

/// Counters for span cache activity.
#[derive(Debug, Default)]
pub struct SpanCacheStats {
    pub inserted: AtomicU64,
    pub rejected: AtomicU64,
    pub taken: AtomicU64,
    pub expired: AtomicU64,
}

/// Concurrent map from transaction identity to its cached expansion.
pub struct SpanCache {
    spans: DashMap<TxnRef, CachedSpan>,
    /// Entries stored or reserved; bounds `spans` without a global lock.
    occupied: AtomicUsize,
    capacity: usize,
    ttl_ms: u64,
    stats: SpanCacheStats,
}

impl SpanCache {
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        Self {
            spans: DashMap::new(),
            occupied: AtomicUsize::new(0),
            capacity,
            ttl_ms,
            stats: SpanCacheStats::default(),
        }
    }

    /// Stores `span` unless its transaction is already cached or the cache is full.
    pub fn insert(&self, txn_ref: TxnRef, span: CachedSpan) -> CacheInsert {
        if self.occupied.fetch_add(1, Ordering::AcqRel) >= self.capacity {
            self.occupied.fetch_sub(1, Ordering::AcqRel);
            self.stats.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(txn = %txn_ref, capacity = self.capacity, "Span cache full; not caching");
            return CacheInsert::AtCapacity;
        }

        match self.spans.entry(txn_ref) {
            Entry::Occupied(_) => {
                self.occupied.fetch_sub(1, Ordering::AcqRel);
                debug!(txn = %txn_ref, "Span already cached");
                CacheInsert::Duplicate
            }
            Entry::Vacant(slot) => {
                slot.insert(span);
                self.stats.inserted.fetch_add(1, Ordering::Relaxed);
                CacheInsert::Inserted
            }
        }
    }

    /// Removes and returns the cached span; a second call returns `None`.
    pub fn take(&self, txn_ref: &TxnRef) -> Option<CachedSpan> {
        let (_, span) = self.spans.remove(txn_ref)?;
        self.occupied.fetch_sub(1, Ordering::AcqRel);
        self.stats.taken.fetch_add(1, Ordering::Relaxed);
        Some(span)
    }

    pub fn contains(&self, txn_ref: &TxnRef) -> bool {
        self.spans.contains_key(txn_ref)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops entries older than the time-to-live. Returns how many were dropped.
    pub fn purge_expired(&self, now_ms: u64) -> usize {
        let mut removed = 0;
        self.spans.retain(|txn_ref, span| {
            let age = now_ms.saturating_sub(span.cached_at);
            if age > self.ttl_ms {
                debug!(txn = %txn_ref, age_ms = age, "Purging expired span");
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            self.occupied.fetch_sub(removed, Ordering::AcqRel);
            self.stats.expired.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    pub fn stats(&self) -> &SpanCacheStats {
        &self.stats
    }
}
