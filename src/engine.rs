//! Engine facade — orchestrates fetch, extraction, caching and fallback.
//!
//! One `Engine` instance owns its cache slots and counters; nothing here is
//! process-global, so independent instances (and tests with an injected
//! fetcher) are cheap. Every failure mode is recovered locally: callers
//! always receive a valid snapshot, degraded or not, never an error.

use crate::acquisition::{FetchError, HttpClient, PageFetcher};
use crate::branches::BranchSet;
use crate::cache::SnapshotCache;
use crate::client_view::ClientView;
use crate::config::EngineConfig;
use crate::extraction;
use crate::fallback;
use crate::snapshot::{Origin, Snapshot};
use crate::stats::{EngineStats, StatsView};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("all extraction strategies returned empty output")]
    ExtractionExhausted,
}

/// Freshness report for one cache slot, surfaced via `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub cached: bool,
    pub fresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub schedule: SlotStatus,
    pub prices: SlotStatus,
}

pub struct Engine {
    config: EngineConfig,
    branches: BranchSet,
    view: ClientView,
    fetcher: Arc<dyn PageFetcher>,
    // One slot per content type. Holding the slot's lock across the whole
    // recheck-fetch-store sequence coalesces concurrent misses into a single
    // outbound fetch.
    schedule_cache: Mutex<SnapshotCache>,
    prices_cache: Mutex<SnapshotCache>,
    stats: EngineStats,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = Arc::new(HttpClient::new(config.timeout_ms));
        Self::with_fetcher(config, fetcher)
    }

    /// Construct with an injected fetcher (tests, alternative transports).
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let branches = BranchSet::new(config.branches.clone());
        let view = ClientView::new(&config.exclusion_keywords, config.max_entries_per_branch);
        let ttl = config.ttl();
        Self {
            config,
            branches,
            view,
            fetcher,
            schedule_cache: Mutex::new(SnapshotCache::new(ttl)),
            prices_cache: Mutex::new(SnapshotCache::new(ttl)),
            stats: EngineStats::default(),
        }
    }

    /// Client view of the schedule, optionally narrowed to one branch.
    ///
    /// Never fails: a fetch or extraction failure degrades to the curated
    /// fallback snapshot on the same call.
    pub async fn get_schedule(&self, branch_filter: Option<&str>) -> Snapshot {
        self.stats.record_request();

        let mut slot = self.schedule_cache.lock().await;
        if let Some(snap) = slot.get() {
            self.stats.record_cache_hit();
            debug!("serving schedule from cache");
            return self.view.schedule(snap, &self.branches, branch_filter);
        }

        match self.refresh_schedule().await {
            Ok(snap) => {
                let out = self.view.schedule(&snap, &self.branches, branch_filter);
                slot.put(snap);
                self.stats.record_success();
                out
            }
            Err(e) => {
                self.stats.record_failure();
                warn!("schedule acquisition failed, serving fallback: {e}");
                self.view
                    .schedule(&fallback::schedule(), &self.branches, branch_filter)
            }
        }
    }

    /// Client view of the price list. Same degradation contract as
    /// [`get_schedule`](Self::get_schedule).
    pub async fn get_prices(&self) -> Snapshot {
        self.stats.record_request();

        let mut slot = self.prices_cache.lock().await;
        if let Some(snap) = slot.get() {
            self.stats.record_cache_hit();
            debug!("serving prices from cache");
            return self.view.prices(snap);
        }

        match self.refresh_prices().await {
            Ok(snap) => {
                let out = self.view.prices(&snap);
                slot.put(snap);
                self.stats.record_success();
                out
            }
            Err(e) => {
                self.stats.record_failure();
                warn!("price acquisition failed, serving fallback: {e}");
                self.view.prices(&fallback::prices())
            }
        }
    }

    async fn refresh_schedule(&self) -> Result<Snapshot, AcquireError> {
        let body = self.fetcher.fetch(&self.config.schedule_url).await?;
        let (sections, strategy) = extraction::schedule_cascade(&body, &self.branches)
            .ok_or(AcquireError::ExtractionExhausted)?;
        info!(?strategy, sections = sections.len(), "schedule extracted");
        Ok(Snapshot::live(&self.config.schedule_url, strategy, sections))
    }

    async fn refresh_prices(&self) -> Result<Snapshot, AcquireError> {
        let body = self.fetcher.fetch(&self.config.prices_url).await?;
        let (sections, strategy) =
            extraction::price_cascade(&body).ok_or(AcquireError::ExtractionExhausted)?;
        info!(?strategy, sections = sections.len(), "prices extracted");
        Ok(Snapshot::live(&self.config.prices_url, strategy, sections))
    }

    /// Best-effort cache warm-up at startup. Failures are logged, never
    /// fatal, and no counters move.
    pub async fn prefetch(&self) {
        match self.refresh_schedule().await {
            Ok(snap) => self.schedule_cache.lock().await.put(snap),
            Err(e) => warn!("startup schedule prefetch failed: {e}"),
        }
        match self.refresh_prices().await {
            Ok(snap) => self.prices_cache.lock().await.put(snap),
            Err(e) => warn!("startup price prefetch failed: {e}"),
        }
    }

    pub fn stats(&self) -> StatsView {
        self.stats.view()
    }

    /// Administrative cache clear; the next request refetches.
    pub async fn clear_cache(&self) {
        self.schedule_cache.lock().await.invalidate();
        self.prices_cache.lock().await.invalidate();
        info!("caches cleared");
    }

    pub async fn cache_status(&self) -> CacheStatus {
        CacheStatus {
            schedule: slot_status(&*self.schedule_cache.lock().await),
            prices: slot_status(&*self.prices_cache.lock().await),
        }
    }

    pub fn branches(&self) -> &BranchSet {
        &self.branches
    }
}

fn slot_status(cache: &SnapshotCache) -> SlotStatus {
    SlotStatus {
        cached: cache.peek().is_some(),
        fresh: cache.is_fresh(),
        age_ms: cache.age().map(|d| d.as_millis() as u64),
        origin: cache.peek().map(|s| s.meta.origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Stub fetcher returning a fixed outcome and counting calls.
    struct StubFetcher {
        body: Result<String, ()>,
        calls: AtomicU64,
        delay: Option<std::time::Duration>,
    }

    impl StubFetcher {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                calls: AtomicU64::new(0),
                delay: None,
            }
        }

        /// Like [`ok`](Self::ok), but each fetch yields for `delay` first so
        /// concurrent callers actually interleave.
        fn ok_delayed(body: &str, delay: std::time::Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::ok(body)
            }
        }

        fn failing() -> Self {
            Self {
                body: Err(()),
                calls: AtomicU64::new(0),
                delay: None,
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.body {
                Ok(b) => Ok(b.clone()),
                Err(()) => Err(FetchError::Network("connection refused".into())),
            }
        }
    }

    const PAGE: &str = r#"
        <html><body>
          <p>Дыбенко: Hip-Hop Пн, Ср 18:00 (новички)</p>
          <p>Купчино: Shuffle Вт, Чт 18:00</p>
        </body></html>
    "#;

    fn engine_with(fetcher: Arc<StubFetcher>) -> Engine {
        Engine::with_fetcher(EngineConfig::default(), fetcher)
    }

    #[test]
    fn schedule_success_builds_live_snapshot() {
        let fetcher = Arc::new(StubFetcher::ok(PAGE));
        let engine = engine_with(Arc::clone(&fetcher));
        let snap = tokio_test::block_on(engine.get_schedule(None));
        assert_eq!(snap.meta.origin, Origin::Live);
        assert!(snap.section("Дыбенко").is_some());
        assert_eq!(engine.stats().successes, 1);
    }

    #[test]
    fn second_call_within_ttl_hits_cache() {
        let fetcher = Arc::new(StubFetcher::ok(PAGE));
        let engine = engine_with(Arc::clone(&fetcher));
        tokio_test::block_on(async {
            engine.get_schedule(None).await;
            engine.get_schedule(None).await;
        });
        // Requests counted per call, but only one network fetch happened.
        assert_eq!(engine.stats().requests, 2);
        assert_eq!(engine.stats().cache_hits, 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn concurrent_misses_coalesce_into_one_fetch() {
        // Two callers race a cold cache; the slot lock is held across the
        // whole recheck-fetch-store sequence, so only one fetch goes out and
        // the loser is served from the freshly filled cache.
        let fetcher = Arc::new(StubFetcher::ok_delayed(
            PAGE,
            std::time::Duration::from_millis(50),
        ));
        let engine = engine_with(Arc::clone(&fetcher));
        tokio_test::block_on(async {
            let (a, b) = tokio::join!(engine.get_schedule(None), engine.get_schedule(None));
            assert_eq!(a.meta.origin, Origin::Live);
            assert_eq!(b.meta.origin, Origin::Live);
        });
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(engine.stats().requests, 2);
        assert_eq!(engine.stats().cache_hits, 1);
    }

    #[test]
    fn fetch_failure_degrades_to_fallback() {
        let fetcher = Arc::new(StubFetcher::failing());
        let engine = engine_with(fetcher);
        let snap = tokio_test::block_on(engine.get_schedule(None));
        assert_eq!(snap.meta.origin, Origin::Fallback);
        assert!(!snap.is_empty());
        assert_eq!(engine.stats().failures, 1);
    }

    #[test]
    fn fallback_is_not_cached() {
        let fetcher = Arc::new(StubFetcher::failing());
        let engine = engine_with(Arc::clone(&fetcher));
        tokio_test::block_on(async {
            engine.get_schedule(None).await;
            engine.get_schedule(None).await;
        });
        // Both calls attempted a refetch — degraded data never poisons the
        // cache.
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(engine.stats().cache_hits, 0);
    }

    #[test]
    fn extraction_exhausted_degrades_to_fallback() {
        let fetcher = Arc::new(StubFetcher::ok("<html><body>пусто</body></html>"));
        let engine = engine_with(fetcher);
        let snap = tokio_test::block_on(engine.get_schedule(None));
        assert_eq!(snap.meta.origin, Origin::Fallback);
        assert_eq!(engine.stats().failures, 1);
    }

    #[test]
    fn clear_cache_forces_refetch() {
        let fetcher = Arc::new(StubFetcher::ok(PAGE));
        let engine = engine_with(Arc::clone(&fetcher));
        tokio_test::block_on(async {
            engine.get_schedule(None).await;
            engine.clear_cache().await;
            engine.get_schedule(None).await;
        });
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn partial_results_are_served_as_is() {
        // Only one branch appears in the page; the snapshot must not be
        // padded with fallback data for the missing branches.
        let page = "<html><body><p>Озерки: Dance Mix Пн 17:00</p></body></html>";
        let fetcher = Arc::new(StubFetcher::ok(page));
        let engine = engine_with(fetcher);
        let snap = tokio_test::block_on(engine.get_schedule(None));
        assert_eq!(snap.meta.origin, Origin::Live);
        assert_eq!(snap.sections.len(), 1);
        assert_eq!(snap.sections[0].name, "Озерки");
    }

    #[test]
    fn branch_filter_narrows_view() {
        let fetcher = Arc::new(StubFetcher::ok(PAGE));
        let engine = engine_with(fetcher);
        let snap = tokio_test::block_on(engine.get_schedule(Some("дыбенко")));
        assert_eq!(snap.sections.len(), 1);
        assert_eq!(snap.sections[0].name, "Дыбенко");
    }

    #[test]
    fn prices_pipeline_shares_the_contract() {
        let page = r#"
            <html><body>
              <h2>Абонементы и цены</h2>
              <p>4 занятия — 3500 рублей</p>
            </body></html>
        "#;
        let fetcher = Arc::new(StubFetcher::ok(page));
        let engine = engine_with(Arc::clone(&fetcher));
        tokio_test::block_on(async {
            let snap = engine.get_prices().await;
            assert_eq!(snap.meta.origin, Origin::Live);
            assert!(!snap.is_empty());
            engine.get_prices().await;
        });
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(engine.stats().cache_hits, 1);
    }
}
