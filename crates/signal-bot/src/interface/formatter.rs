//! Reply texts and keyboards

use super::message::{BotResponse, Keyboard};
use crate::catalog::{Instrument, Timeframe};
use crate::engine::Signal;
use crate::error::SignalError;

pub const START_COMMAND: &str = "/start";
pub const MAIN_MENU: &str = "Выбрать валютную пару";
pub const STANDARD_PAIRS: &str = "Обычные пары";
pub const OTC_PAIRS: &str = "OTC пары";
pub const BACK: &str = "Назад";
pub const CHANGE_PAIR: &str = "Сменить пару";

const GREETING: &str = "👋 Привет! Я бот-сигнальщик. Выбери действие:";
const CHOOSE_ACTION: &str = "Выбери действие:";
const CHOOSE_PAIR: &str = "Выбери валютную пару:";
const CHOOSE_OTC_PAIR: &str = "Выбери OTC пару:";
const NO_SELECTION: &str = "Сначала выбери валютную пару через кнопку Start.";
const MARKET_CLOSED: &str = "❌ Нет данных: рынок закрыт.\n👉 Перейти к OTC парам?";

/// Builds every reply the bot sends
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

impl Formatter {
    pub fn main_menu_keyboard() -> Keyboard {
        Keyboard::new()
            .row([MAIN_MENU])
            .row([STANDARD_PAIRS, OTC_PAIRS])
    }

    /// One instrument per row, then a back button
    pub fn instruments_keyboard(instruments: &[Instrument]) -> Keyboard {
        Keyboard::new()
            .column(instruments.iter().map(Instrument::id))
            .row([BACK])
    }

    /// One timeframe per row, then navigation
    pub fn timeframes_keyboard(instrument: &Instrument) -> Keyboard {
        Keyboard::new()
            .column(instrument.timeframes().iter().map(|tf| tf.label()))
            .row([CHANGE_PAIR, BACK])
    }

    pub fn market_closed_keyboard() -> Keyboard {
        Keyboard::new().row([OTC_PAIRS, BACK])
    }

    pub fn greeting() -> BotResponse {
        BotResponse::text(GREETING).with_keyboard(Self::main_menu_keyboard())
    }

    pub fn main_menu() -> BotResponse {
        BotResponse::text(CHOOSE_ACTION).with_keyboard(Self::main_menu_keyboard())
    }

    pub fn instrument_list(instruments: &[Instrument], is_otc: bool) -> BotResponse {
        let text = if is_otc { CHOOSE_OTC_PAIR } else { CHOOSE_PAIR };
        BotResponse::text(text).with_keyboard(Self::instruments_keyboard(instruments))
    }

    pub fn instrument_selected(instrument: &Instrument) -> BotResponse {
        BotResponse::text(format!("✅ Пара: {instrument}\nВыберите таймфрейм:"))
            .with_keyboard(Self::timeframes_keyboard(instrument))
    }

    /// Signal reply; the timeframe keyboard stays in place
    pub fn signal(instrument: &Instrument, timeframe: Timeframe, signal: Signal) -> BotResponse {
        BotResponse::text(format!(
            "📊 Пара: {instrument}\n⏱ Таймфрейм: {timeframe}\n💡 Сигнал: {signal}\n\n{}",
            signal.explanation()
        ))
    }

    pub fn analysis_failed(
        instrument: &Instrument,
        timeframe: Timeframe,
        error: &SignalError,
    ) -> BotResponse {
        BotResponse::text(format!(
            "⚠️ Ошибка анализа для {instrument} на {timeframe}: {error}"
        ))
    }

    pub fn no_selection() -> BotResponse {
        BotResponse::text(NO_SELECTION)
    }

    pub fn market_closed() -> BotResponse {
        BotResponse::text(MARKET_CLOSED).with_keyboard(Self::market_closed_keyboard())
    }
}
