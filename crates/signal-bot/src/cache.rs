//! Short-lived report cache in front of the analysis feed
//!
//! Several users asking for the same pair and interval within a few seconds
//! share one upstream call. Only successful reports are stored.

use crate::api::AnalysisProvider;
use crate::catalog::AnalysisInterval;
use crate::engine::AnalysisReport;
use crate::error::Result;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for a report request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    /// Feed symbol
    pub symbol: String,
    pub interval: AnalysisInterval,
}

impl ReportKey {
    pub fn new(symbol: impl Into<String>, interval: AnalysisInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
        }
    }
}

/// Thread-safe timed cache of analysis reports
pub struct ReportCache {
    cache: Arc<RwLock<TimedCache<ReportKey, AnalysisReport>>>,
}

impl ReportCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &ReportKey) -> Option<AnalysisReport> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: ReportKey, report: AnalysisReport) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, report);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for ReportCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// An [`AnalysisProvider`] that reuses recent reports
pub struct CachedAnalysisProvider {
    inner: Arc<dyn AnalysisProvider>,
    cache: ReportCache,
}

impl CachedAnalysisProvider {
    pub fn new(inner: Arc<dyn AnalysisProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: ReportCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }
}

#[async_trait]
impl AnalysisProvider for CachedAnalysisProvider {
    async fn fetch_report(
        &self,
        symbol: &str,
        interval: AnalysisInterval,
    ) -> Result<AnalysisReport> {
        let key = ReportKey::new(symbol, interval);

        if let Some(report) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(report);
        }

        tracing::debug!("Cache miss for key: {:?}", key);
        let report = self.inner.fetch_report(symbol, interval).await?;
        self.cache.insert(key, report.clone()).await;

        Ok(report)
    }
}
