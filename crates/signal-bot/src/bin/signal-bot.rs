//! Forex signal bot
//!
//! Serves BUY/SELL signals for forex pairs over Telegram.
//!
//! # Usage
//!
//! ```bash
//! export TELEGRAM_TOKEN="123456:ABC..."
//! cargo run --bin signal-bot -p signal-bot -- --cache-ttl-secs 0
//! ```

use clap::Parser;
use signal_bot::api::{AnalysisProvider, TradingViewClient};
use signal_bot::bot::SignalBot;
use signal_bot::cache::CachedAnalysisProvider;
use signal_bot::engine::SignalEngine;
use signal_bot::platforms::{TelegramBot, TelegramConfig};
use signal_bot::SignalConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "signal-bot")]
#[command(about = "Telegram bot serving forex BUY/SELL signals", long_about = None)]
struct Args {
    /// Long-poll timeout for Telegram updates, in seconds
    #[arg(long)]
    poll_timeout_secs: Option<u64>,

    /// How long analysis reports are reused, in seconds (0 disables)
    #[arg(long)]
    cache_ttl_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    signal_utils::init_tracing();

    let args = Args::parse();

    let mut telegram_config = TelegramConfig::from_env()?;
    if let Some(secs) = args.poll_timeout_secs {
        telegram_config = telegram_config.with_poll_timeout(Duration::from_secs(secs));
    }

    let mut builder = SignalConfig::builder().with_env(&signal_utils::ProcessEnv)?;
    if let Some(secs) = args.cache_ttl_secs {
        builder = builder.report_cache_ttl(Duration::from_secs(secs));
    }
    let signal_config = builder.build()?;

    info!(
        scanner = %signal_config.scanner_url,
        cache_ttl = ?signal_config.report_cache_ttl,
        "Starting signal bot"
    );

    let scanner = Arc::new(TradingViewClient::new(&signal_config)?);
    let provider: Arc<dyn AnalysisProvider> = if signal_config.cache_enabled() {
        Arc::new(CachedAnalysisProvider::new(
            scanner,
            signal_config.report_cache_ttl,
        ))
    } else {
        scanner
    };

    let bot = SignalBot::new(SignalEngine::new(provider));
    let telegram = TelegramBot::new(telegram_config, bot)?;

    telegram.run().await;

    info!("Shutting down");
    Ok(())
}
