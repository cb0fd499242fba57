//! Forex signal bot
//!
//! A chat bot that hands out binary BUY/SELL signals for forex pairs. It
//! includes:
//!
//! - A fixed catalog of standard pairs and their OTC variants
//! - A trading-hours gate evaluated in Moscow time
//! - A coercion cascade that turns any analysis report into BUY or SELL
//! - Per-user selection sessions
//! - A TradingView scanner client with rate limiting and a short-lived cache
//! - A Telegram long-polling transport
//!
//! # Architecture
//!
//! `platforms::TelegramBot` receives messages and passes them to
//! `bot::SignalBot`, which parses menu actions and drives
//! `engine::SignalEngine`. The engine owns the session store, the market
//! clock and the coercer, and fetches reports through an
//! `api::AnalysisProvider`.
//!
//! # Example
//!
//! ```rust,ignore
//! use signal_bot::{SignalBot, SignalConfig, SignalEngine, TradingViewClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SignalConfig::from_env()?;
//!     let provider = Arc::new(TradingViewClient::new(&config)?);
//!     let bot = SignalBot::new(SignalEngine::new(provider));
//!
//!     bot.handle(1, "EUR/USD OTC").await;
//!     if let Some(reply) = bot.handle(1, "30s").await {
//!         println!("{}", reply.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod market;
pub mod platforms;

// Re-export main types for convenience
pub use api::{AnalysisProvider, TradingViewClient};
pub use bot::{MenuAction, SignalBot};
pub use catalog::{Instrument, InstrumentCatalog, Timeframe};
pub use config::SignalConfig;
pub use engine::{SelectionOutcome, Signal, SignalCoercer, SignalEngine};
pub use error::{Result, SignalError};
pub use market::{MarketClock, SystemClock, is_market_closed};
