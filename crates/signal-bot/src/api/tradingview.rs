//! TradingView scanner client
//!
//! Requests aggregate recommendations and moving-average values for a single
//! ticker and turns them into an [`AnalysisReport`].

use super::AnalysisProvider;
use crate::catalog::AnalysisInterval;
use crate::config::SignalConfig;
use crate::engine::{AnalysisReport, IndicatorGroup, Recommendation};
use crate::error::{Result, SignalError};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

const USER_AGENT: &str = concat!("signal-bot/", env!("CARGO_PKG_VERSION"));

const RECOMMEND_ALL: &str = "Recommend.All";
const RECOMMEND_MA: &str = "Recommend.MA";
const RECOMMEND_OTHER: &str = "Recommend.Other";
const CLOSE: &str = "close";

/// Moving averages that vote in the trend-following group: (vote name, column)
///
/// Ichimoku votes on its base line against the close only. TradingView's own
/// tally also weighs the conversion line and both cloud leads, so that single
/// vote can differ from the upstream breakdown.
static MOVING_AVERAGES: [(&str, &str); 15] = [
    ("EMA10", "EMA10"),
    ("SMA10", "SMA10"),
    ("EMA20", "EMA20"),
    ("SMA20", "SMA20"),
    ("EMA30", "EMA30"),
    ("SMA30", "SMA30"),
    ("EMA50", "EMA50"),
    ("SMA50", "SMA50"),
    ("EMA100", "EMA100"),
    ("SMA100", "SMA100"),
    ("EMA200", "EMA200"),
    ("SMA200", "SMA200"),
    ("Ichimoku", "Ichimoku.BLine"),
    ("VWMA", "VWMA"),
    ("HullMA", "HullMA9"),
];

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// TradingView scanner API client
#[derive(Debug, Clone)]
pub struct TradingViewClient {
    client: Client,
    scanner_url: String,
    screener: String,
    exchange: String,
    rate_limiter: SharedRateLimiter,
}

impl TradingViewClient {
    /// Create a client from the signal configuration
    pub fn new(config: &SignalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let per_minute = NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client,
            scanner_url: config.scanner_url.trim_end_matches('/').to_string(),
            screener: config.screener.clone(),
            exchange: config.exchange.clone(),
            rate_limiter,
        })
    }

    fn scan_url(&self) -> String {
        format!("{}/{}/scan", self.scanner_url, self.screener)
    }

    fn ticker(&self, symbol: &str) -> String {
        format!("{}:{}", self.exchange, symbol.to_uppercase())
    }

    /// Fetch the analysis for a symbol on an interval
    pub async fn get_analysis(
        &self,
        symbol: &str,
        interval: AnalysisInterval,
    ) -> Result<AnalysisReport> {
        self.rate_limiter.until_ready().await;

        let columns = scan_columns(interval);
        let body = json!({
            "symbols": {
                "tickers": [self.ticker(symbol)],
                "query": { "types": [] },
            },
            "columns": columns,
        });

        tracing::debug!(symbol, %interval, "Requesting scanner analysis");
        let response = self.client.post(self.scan_url()).json(&body).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SignalError::RateLimitExceeded {
                provider: "TradingView".to_string(),
            });
        }
        if !status.is_success() {
            return Err(SignalError::ApiError(format!("HTTP error: {status}")));
        }

        let data: Value = response.json().await?;
        parse_scan_response(symbol, interval, &data)
    }
}

#[async_trait]
impl AnalysisProvider for TradingViewClient {
    async fn fetch_report(
        &self,
        symbol: &str,
        interval: AnalysisInterval,
    ) -> Result<AnalysisReport> {
        self.get_analysis(symbol, interval).await
    }
}

/// Column names without the interval suffix, in response order
fn base_columns() -> impl Iterator<Item = &'static str> {
    [RECOMMEND_ALL, RECOMMEND_MA, RECOMMEND_OTHER, CLOSE]
        .into_iter()
        .chain(MOVING_AVERAGES.iter().map(|(_, column)| *column))
}

/// Columns requested for one interval
pub(crate) fn scan_columns(interval: AnalysisInterval) -> Vec<String> {
    let suffix = interval.scanner_suffix();
    base_columns()
        .map(|column| format!("{column}{suffix}"))
        .collect()
}

/// Vote of a moving average against the last close
fn moving_average_vote(average: f64, close: f64) -> &'static str {
    if average < close {
        "BUY"
    } else if average > close {
        "SELL"
    } else {
        "NEUTRAL"
    }
}

/// Build a report from a scanner response body
pub(crate) fn parse_scan_response(
    symbol: &str,
    interval: AnalysisInterval,
    body: &Value,
) -> Result<AnalysisReport> {
    let rows = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| SignalError::MalformedReport("missing data array".to_string()))?;

    let row = rows.first().ok_or_else(|| SignalError::DataUnavailable {
        symbol: symbol.to_string(),
        reason: "scanner returned no rows".to_string(),
    })?;

    let values = row
        .get("d")
        .and_then(Value::as_array)
        .ok_or_else(|| SignalError::MalformedReport("missing value row".to_string()))?;

    let indicators: HashMap<&str, Option<f64>> = base_columns()
        .zip(values.iter().map(Value::as_f64))
        .collect();

    let value = |name: &str| indicators.get(name).copied().flatten();
    let score = |name: &str| value(name).and_then(Recommendation::from_score);

    let mut moving_averages = IndicatorGroup::with_recommendation(score(RECOMMEND_MA));
    if let Some(close) = value(CLOSE) {
        for (vote_name, column) in MOVING_AVERAGES {
            if let Some(average) = value(column) {
                moving_averages =
                    moving_averages.with_vote(vote_name, moving_average_vote(average, close));
            }
        }
    }

    Ok(AnalysisReport::new(symbol)
        .with_interval(interval)
        .with_summary(score(RECOMMEND_ALL))
        .with_moving_averages(moving_averages)
        .with_oscillators(IndicatorGroup::with_recommendation(score(RECOMMEND_OTHER))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<Value>) -> Value {
        json!({ "totalCount": 1, "data": [{ "s": "FX_IDC:EURUSD", "d": values }] })
    }

    #[test]
    fn test_client_creation() {
        let config = SignalConfig::default();
        let client = TradingViewClient::new(&config).unwrap();
        assert_eq!(client.scan_url(), "https://scanner.tradingview.com/forex/scan");
        assert_eq!(client.ticker("eurusd"), "FX_IDC:EURUSD");
    }

    #[test]
    fn test_scan_columns_carry_interval_suffix() {
        let columns = scan_columns(AnalysisInterval::FifteenMinutes);
        assert_eq!(columns.len(), 4 + MOVING_AVERAGES.len());
        assert_eq!(columns[0], "Recommend.All|15");
        assert_eq!(columns[3], "close|15");
        assert!(columns.contains(&"Ichimoku.BLine|15".to_string()));
        assert!(columns.iter().all(|c| c.ends_with("|15")));
    }

    #[test]
    fn test_parse_full_response() {
        // all, ma, other, close, then MAs in declaration order
        let mut values = vec![json!(0.6), json!(-0.3), json!(0.0), json!(1.1000)];
        values.extend((0..MOVING_AVERAGES.len()).map(|i| {
            if i < 10 { json!(1.0900) } else { json!(1.1100) }
        }));

        let report =
            parse_scan_response("EURUSD", AnalysisInterval::FiveMinutes, &row(values)).unwrap();

        assert_eq!(report.symbol, "EURUSD");
        assert_eq!(report.interval, Some(AnalysisInterval::FiveMinutes));
        assert_eq!(report.summary, Some(Recommendation::StrongBuy));
        assert_eq!(report.moving_averages.recommendation, Some(Recommendation::Sell));
        assert_eq!(report.oscillators.recommendation, Some(Recommendation::Neutral));

        let votes = &report.moving_averages.votes;
        assert_eq!(votes.len(), MOVING_AVERAGES.len());
        assert_eq!(votes["EMA10"], "BUY");
        assert_eq!(votes["EMA200"], "SELL");
        assert_eq!(votes["HullMA"], "SELL");
    }

    #[test]
    fn test_ichimoku_votes_on_base_line() {
        let mut values = vec![json!(0.0), json!(0.0), json!(0.0), json!(1.2000)];
        values.extend(MOVING_AVERAGES.iter().map(|(name, _)| {
            if *name == "Ichimoku" { json!(1.1000) } else { Value::Null }
        }));

        let report =
            parse_scan_response("EURUSD", AnalysisInterval::OneHour, &row(values)).unwrap();

        let votes = &report.moving_averages.votes;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes["Ichimoku"], "BUY");
        assert!(scan_columns(AnalysisInterval::OneHour).contains(&"Ichimoku.BLine|60".to_string()));
    }

    #[test]
    fn test_parse_nulls_become_absent() {
        let mut values = vec![Value::Null, json!("oops"), json!(7.5), Value::Null];
        values.extend((0..MOVING_AVERAGES.len()).map(|_| json!(1.0)));

        let report =
            parse_scan_response("GBPUSD", AnalysisInterval::OneHour, &row(values)).unwrap();

        assert_eq!(report.summary, None);
        assert_eq!(report.moving_averages.recommendation, None);
        assert_eq!(report.oscillators.recommendation, None);
        // no close price, so no votes
        assert!(report.moving_averages.votes.is_empty());
    }

    #[test]
    fn test_parse_short_row_is_partial() {
        let report = parse_scan_response(
            "USDJPY",
            AnalysisInterval::OneMinute,
            &row(vec![json!(-0.2)]),
        )
        .unwrap();

        assert_eq!(report.summary, Some(Recommendation::Sell));
        assert_eq!(report.moving_averages.recommendation, None);
    }

    #[test]
    fn test_parse_empty_data_is_error() {
        let body = json!({ "totalCount": 0, "data": [] });
        let err = parse_scan_response("EURUSD", AnalysisInterval::OneMinute, &body).unwrap_err();
        assert!(matches!(err, SignalError::DataUnavailable { .. }));

        let body = json!({ "error": "bad request" });
        let err = parse_scan_response("EURUSD", AnalysisInterval::OneMinute, &body).unwrap_err();
        assert!(matches!(err, SignalError::MalformedReport(_)));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_analysis_live() {
        let client = TradingViewClient::new(&SignalConfig::default()).unwrap();
        let report = client
            .get_analysis("EURUSD", AnalysisInterval::FiveMinutes)
            .await
            .unwrap();
        assert_eq!(report.symbol, "EURUSD");
    }
}
