//! Conversation controller
//!
//! Maps each incoming message to a [`MenuAction`], drives the
//! [`SignalEngine`] and renders the reply. The controller is stateless
//! apart from the engine's session store, so one instance serves every
//! chat concurrently.
//!
//! # Example
//!
//! ```rust,ignore
//! use signal_bot::bot::SignalBot;
//! use signal_bot::engine::SignalEngine;
//! use std::sync::Arc;
//!
//! let bot = SignalBot::new(SignalEngine::new(Arc::new(provider)));
//! if let Some(reply) = bot.handle(user_id, "/start").await {
//!     println!("{}", reply.text);
//! }
//! ```

pub mod commands;

use crate::engine::{SelectionOutcome, SignalEngine};
use crate::interface::{BotResponse, Formatter, UserId};

pub use commands::MenuAction;

/// Forex signal bot
pub struct SignalBot {
    engine: SignalEngine,
}

impl SignalBot {
    pub fn new(engine: SignalEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Handle one message; `None` means no reply is sent
    pub async fn handle(&self, user_id: UserId, text: &str) -> Option<BotResponse> {
        let action = MenuAction::parse(text, self.engine.catalog());
        tracing::debug!(user_id, ?action, "Handling message");
        self.execute(user_id, action).await
    }

    /// Execute a parsed action
    pub async fn execute(&self, user_id: UserId, action: MenuAction) -> Option<BotResponse> {
        let catalog = self.engine.catalog();

        match action {
            MenuAction::Start => Some(Formatter::greeting()),
            MenuAction::MainMenu => Some(Formatter::main_menu()),
            MenuAction::StandardPairs => Some(Formatter::instrument_list(catalog.standard(), false)),
            MenuAction::OtcPairs => Some(Formatter::instrument_list(catalog.otc(), true)),
            MenuAction::Instrument(instrument) => self
                .engine
                .select_instrument(user_id, instrument)
                .map(|session| Formatter::instrument_selected(&session.instrument)),
            MenuAction::Timeframe(timeframe) => {
                match self.engine.choose_timeframe(user_id, timeframe).await {
                    SelectionOutcome::Signal(result) => Some(Formatter::signal(
                        &result.instrument,
                        result.timeframe,
                        result.signal,
                    )),
                    SelectionOutcome::MarketClosed { .. } => Some(Formatter::market_closed()),
                    SelectionOutcome::NoActiveSelection => Some(Formatter::no_selection()),
                    SelectionOutcome::Rejected { .. } => None,
                    SelectionOutcome::AnalysisFailed {
                        instrument,
                        timeframe,
                        error,
                    } => Some(Formatter::analysis_failed(&instrument, timeframe, &error)),
                }
            }
            MenuAction::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAnalysisProvider;
    use crate::engine::{AnalysisReport, FixedEntropy, Recommendation, Signal};
    use crate::error::SignalError;
    use crate::market::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn bot_at(mock: MockAnalysisProvider, clock: FixedClock) -> SignalBot {
        SignalBot::new(
            SignalEngine::new(Arc::new(mock))
                .with_clock(Arc::new(clock))
                .with_entropy(Arc::new(FixedEntropy(Signal::Buy))),
        )
    }

    fn weekday() -> FixedClock {
        // Wednesday 15:30 Moscow time
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 5, 12, 30, 0).unwrap())
    }

    fn weekend() -> FixedClock {
        // Sunday 12:00 Moscow time
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 9, 9, 0, 0).unwrap())
    }

    fn sell_provider() -> MockAnalysisProvider {
        let mut mock = MockAnalysisProvider::new();
        mock.expect_fetch_report()
            .returning(|symbol, _| Ok(AnalysisReport::new(symbol).with_summary(Some(Recommendation::StrongSell))));
        mock
    }

    #[tokio::test]
    async fn test_start_shows_main_menu() {
        let bot = bot_at(MockAnalysisProvider::new(), weekday());

        let reply = bot.handle(1, "/start").await.unwrap();
        assert!(reply.text.contains("Привет"));
        assert!(reply.keyboard.unwrap().contains("OTC пары"));
    }

    #[tokio::test]
    async fn test_pair_lists() {
        let bot = bot_at(MockAnalysisProvider::new(), weekday());

        let standard = bot.handle(1, "Обычные пары").await.unwrap();
        let keyboard = standard.keyboard.unwrap();
        assert!(keyboard.contains("EUR/USD"));
        assert!(!keyboard.contains("EUR/USD OTC"));

        let otc = bot.handle(1, "OTC пары").await.unwrap();
        assert!(otc.keyboard.unwrap().contains("GBP/NZD OTC"));
    }

    #[tokio::test]
    async fn test_full_flow_to_signal() {
        let bot = bot_at(sell_provider(), weekday());

        let selected = bot.handle(7, "USD/CAD").await.unwrap();
        assert!(selected.text.contains("USD/CAD"));
        assert!(selected.keyboard.unwrap().contains("15m"));

        let reply = bot.handle(7, "15m").await.unwrap();
        assert!(reply.text.contains("💡 Сигнал: SELL"));
        assert!(reply.text.contains("⏱ Таймфрейм: 15m"));

        // back to the menu keeps the selection
        bot.handle(7, "Назад").await.unwrap();
        let again = bot.handle(7, "1h").await.unwrap();
        assert!(again.text.contains("USD/CAD"));
    }

    #[tokio::test]
    async fn test_timeframe_without_selection() {
        let bot = bot_at(MockAnalysisProvider::new(), weekday());

        let reply = bot.handle(3, "5m").await.unwrap();
        assert_eq!(reply.text, "Сначала выбери валютную пару через кнопку Start.");
    }

    #[tokio::test]
    async fn test_market_closed_offers_otc() {
        let bot = bot_at(MockAnalysisProvider::new(), weekend());

        bot.handle(4, "EUR/USD").await.unwrap();
        let reply = bot.handle(4, "5m").await.unwrap();

        assert!(reply.text.starts_with("❌ Нет данных"));
        let keyboard = reply.keyboard.unwrap();
        assert_eq!(keyboard.rows, vec![vec!["OTC пары", "Назад"]]);
    }

    #[tokio::test]
    async fn test_otc_open_on_weekend() {
        let bot = bot_at(sell_provider(), weekend());

        bot.handle(4, "EUR/USD OTC").await.unwrap();
        let reply = bot.handle(4, "10s").await.unwrap();
        assert!(reply.text.contains("💡 Сигнал: SELL"));
    }

    #[tokio::test]
    async fn test_invalid_timeframe_is_silent() {
        let bot = bot_at(MockAnalysisProvider::new(), weekday());

        bot.handle(5, "EUR/USD").await.unwrap();
        assert!(bot.handle(5, "5s").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_text_is_silent() {
        let bot = bot_at(MockAnalysisProvider::new(), weekday());

        assert!(bot.handle(5, "привет").await.is_none());
        assert!(bot.handle(5, "XAU/USD").await.is_none());
        assert!(bot.engine().session(5).is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_reply() {
        let mut mock = MockAnalysisProvider::new();
        mock.expect_fetch_report().returning(|symbol, _| {
            Err(SignalError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "scanner returned no rows".to_string(),
            })
        });
        let bot = bot_at(mock, weekday());

        bot.handle(8, "GBP/USD").await.unwrap();
        let reply = bot.handle(8, "30m").await.unwrap();

        assert!(reply.text.starts_with("⚠️ Ошибка анализа для GBP/USD на 30m: "));
        assert!(reply.text.contains("GBPUSD"));
        assert!(bot.engine().session(8).is_some());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let bot = bot_at(sell_provider(), weekday());

        bot.handle(1, "EUR/USD OTC").await.unwrap();
        bot.handle(2, "EUR/USD").await.unwrap();

        assert!(bot.handle(1, "5s").await.is_some());
        assert!(bot.handle(2, "5s").await.is_none());
    }
}
