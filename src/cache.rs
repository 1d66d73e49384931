//! Single-slot TTL cache for snapshots.
//!
//! Holds at most one snapshot per content type. The record is never mutated
//! in place — `put` replaces it wholesale, `invalidate` clears it so the next
//! `get` misses regardless of age.

use crate::snapshot::Snapshot;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CacheRecord {
    snapshot: Snapshot,
    created_at: Instant,
}

#[derive(Debug)]
pub struct SnapshotCache {
    slot: Option<CacheRecord>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// The cached snapshot, if one exists and is still fresh.
    pub fn get(&self) -> Option<&Snapshot> {
        self.slot
            .as_ref()
            .filter(|rec| rec.created_at.elapsed() < self.ttl)
            .map(|rec| &rec.snapshot)
    }

    pub fn put(&mut self, snapshot: Snapshot) {
        self.slot = Some(CacheRecord {
            snapshot,
            created_at: Instant::now(),
        });
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Age of the cached record, fresh or not.
    pub fn age(&self) -> Option<Duration> {
        self.slot.as_ref().map(|rec| rec.created_at.elapsed())
    }

    pub fn is_fresh(&self) -> bool {
        self.get().is_some()
    }

    /// The cached snapshot ignoring freshness, for health reporting.
    pub fn peek(&self) -> Option<&Snapshot> {
        self.slot.as_ref().map(|rec| &rec.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Section, Snapshot, StrategyKind};

    fn sample() -> Snapshot {
        Snapshot::live(
            "https://example.com",
            StrategyKind::Unstructured,
            vec![Section::with_entries("Озерки", ["Dance Mix Пн 17:00"])],
        )
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = SnapshotCache::new(Duration::from_secs(3600));
        assert!(cache.get().is_none());
        cache.put(sample());
        assert!(cache.get().is_some());
        assert!(cache.is_fresh());
    }

    #[test]
    fn miss_after_expiry() {
        let mut cache = SnapshotCache::new(Duration::ZERO);
        cache.put(sample());
        // Zero TTL: expired immediately, but the record is still peekable.
        assert!(cache.get().is_none());
        assert!(cache.peek().is_some());
    }

    #[test]
    fn invalidate_forces_miss() {
        let mut cache = SnapshotCache::new(Duration::from_secs(3600));
        cache.put(sample());
        cache.invalidate();
        assert!(cache.get().is_none());
        assert!(cache.peek().is_none());
        assert!(cache.age().is_none());
    }

    #[test]
    fn put_replaces_wholesale() {
        let mut cache = SnapshotCache::new(Duration::from_secs(3600));
        cache.put(sample());
        let replacement = Snapshot::live(
            "https://example.com",
            StrategyKind::Structured,
            vec![Section::with_entries("Купчино", ["Shuffle Вт 18:00"])],
        );
        cache.put(replacement);
        let cached = cache.get().unwrap();
        assert_eq!(cached.sections[0].name, "Купчино");
    }
}
