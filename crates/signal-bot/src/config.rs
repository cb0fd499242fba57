//! Configuration for signal analysis operations

use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};
use signal_utils::EnvSource;
use std::time::Duration;

/// Configuration for the analysis side of the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Base URL of the TradingView scanner API
    pub scanner_url: String,

    /// Scanner screener the pairs are listed under
    pub screener: String,

    /// Exchange prefix for tickers
    pub exchange: String,

    /// Request timeout for a single analysis call
    pub request_timeout: Duration,

    /// Maximum scanner requests per minute
    pub rate_limit_per_minute: u32,

    /// How long a fetched report may be reused; zero disables caching
    pub report_cache_ttl: Duration,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            scanner_url: "https://scanner.tradingview.com".to_string(),
            screener: "forex".to_string(),
            exchange: "FX_IDC".to_string(),
            request_timeout: Duration::from_secs(10),
            rate_limit_per_minute: 60,
            report_cache_ttl: Duration::from_secs(30),
        }
    }
}

impl SignalConfig {
    /// Create a new configuration builder
    pub fn builder() -> SignalConfigBuilder {
        SignalConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env(&signal_utils::ProcessEnv)?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scanner_url.trim().is_empty() {
            return Err(SignalError::ConfigError(
                "scanner_url must not be empty".to_string(),
            ));
        }

        if self.screener.trim().is_empty() || self.exchange.trim().is_empty() {
            return Err(SignalError::ConfigError(
                "screener and exchange must not be empty".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(SignalError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(SignalError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether fetched reports are cached at all
    pub fn cache_enabled(&self) -> bool {
        !self.report_cache_ttl.is_zero()
    }
}

/// Builder for SignalConfig
#[derive(Debug, Default)]
pub struct SignalConfigBuilder {
    scanner_url: Option<String>,
    screener: Option<String>,
    exchange: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    report_cache_ttl: Option<Duration>,
}

impl SignalConfigBuilder {
    /// Set the scanner base URL
    pub fn scanner_url(mut self, url: impl Into<String>) -> Self {
        self.scanner_url = Some(url.into());
        self
    }

    /// Set the screener
    pub fn screener(mut self, screener: impl Into<String>) -> Self {
        self.screener = Some(screener.into());
        self
    }

    /// Set the exchange prefix
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the outbound rate limit
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set report cache TTL
    pub fn report_cache_ttl(mut self, duration: Duration) -> Self {
        self.report_cache_ttl = Some(duration);
        self
    }

    /// Apply overrides found in an environment source
    pub fn with_env(mut self, env: &impl EnvSource) -> Result<Self> {
        if let Some(url) = env.optional("TRADINGVIEW_SCANNER_URL") {
            self.scanner_url = Some(url);
        }
        if let Some(limit) = env.parsed("SCANNER_RATE_LIMIT_PER_MINUTE")? {
            self.rate_limit_per_minute = Some(limit);
        }
        if let Some(secs) = env.parsed("REPORT_CACHE_TTL_SECS")? {
            self.report_cache_ttl = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = env.parsed("REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<SignalConfig> {
        let defaults = SignalConfig::default();

        let config = SignalConfig {
            scanner_url: self.scanner_url.unwrap_or(defaults.scanner_url),
            screener: self.screener.unwrap_or(defaults.screener),
            exchange: self.exchange.unwrap_or(defaults.exchange),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            report_cache_ttl: self.report_cache_ttl.unwrap_or(defaults.report_cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
