//! Error types for signal operations

use thiserror::Error;

/// Signal bot specific errors
#[derive(Debug, Error)]
pub enum SignalError {
    /// Analysis API returned an error response
    #[error("API error: {0}")]
    ApiError(String),

    /// The analysis feed has no data for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// The report could not be interpreted at all
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Telegram client could not be set up
    #[error("Telegram error: {0}")]
    TelegramError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;

impl From<signal_utils::EnvError> for SignalError {
    fn from(err: signal_utils::EnvError) -> Self {
        SignalError::ConfigError(err.to_string())
    }
}
