//! Analysis feed clients

pub mod tradingview;

pub use tradingview::TradingViewClient;

use crate::catalog::AnalysisInterval;
use crate::engine::AnalysisReport;
use crate::error::Result;
use async_trait::async_trait;

/// Source of technical-analysis reports.
///
/// Implementations may fail for any reason (network, rate limit, malformed
/// payload); callers treat every failure the same way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Fetch a report for a feed symbol on one interval
    async fn fetch_report(&self, symbol: &str, interval: AnalysisInterval)
    -> Result<AnalysisReport>;
}
