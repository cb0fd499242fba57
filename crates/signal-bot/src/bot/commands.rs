//! Menu action parsing
//!
//! Incoming text is matched exactly against button labels. `/start` is
//! checked first, then navigation labels, then timeframe labels, then
//! instrument ids.

use crate::catalog::{Instrument, InstrumentCatalog, Timeframe};
use crate::interface::formatter::{
    BACK, CHANGE_PAIR, MAIN_MENU, OTC_PAIRS, START_COMMAND, STANDARD_PAIRS,
};

/// Parsed action from a button press or typed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// `/start`
    Start,
    /// Main menu, back, or change pair
    MainMenu,
    /// Show the standard pair list
    StandardPairs,
    /// Show the OTC pair list
    OtcPairs,
    /// Pick a timeframe for the current selection
    Timeframe(Timeframe),
    /// Pick an instrument
    Instrument(Instrument),
    /// Anything else; ignored
    Unknown,
}

impl MenuAction {
    /// Parse a payload against the menu and the catalog
    pub fn parse(text: &str, catalog: &InstrumentCatalog) -> Self {
        if is_start_command(text) {
            return Self::Start;
        }

        match text {
            MAIN_MENU | BACK | CHANGE_PAIR => return Self::MainMenu,
            STANDARD_PAIRS => return Self::StandardPairs,
            OTC_PAIRS => return Self::OtcPairs,
            _ => {}
        }

        if let Some(timeframe) = Timeframe::from_label(text) {
            return Self::Timeframe(timeframe);
        }

        catalog
            .find(text)
            .map_or(Self::Unknown, Self::Instrument)
    }
}

/// `/start`, optionally addressed (`/start@SomeBot`) or with a deep-link payload
fn is_start_command(text: &str) -> bool {
    text.strip_prefix(START_COMMAND)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['@', ' ']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        let catalog = InstrumentCatalog::new();

        assert_eq!(MenuAction::parse("/start", &catalog), MenuAction::Start);
        assert_eq!(MenuAction::parse("/start@ForexSignalBot", &catalog), MenuAction::Start);
        assert_eq!(MenuAction::parse("/start ref_42", &catalog), MenuAction::Start);
        assert_eq!(MenuAction::parse("Назад", &catalog), MenuAction::MainMenu);
        assert_eq!(MenuAction::parse("Сменить пару", &catalog), MenuAction::MainMenu);
        assert_eq!(
            MenuAction::parse("Выбрать валютную пару", &catalog),
            MenuAction::MainMenu
        );
        assert_eq!(MenuAction::parse("Обычные пары", &catalog), MenuAction::StandardPairs);
        assert_eq!(MenuAction::parse("OTC пары", &catalog), MenuAction::OtcPairs);
    }

    #[test]
    fn test_parse_timeframes() {
        let catalog = InstrumentCatalog::new();

        assert_eq!(
            MenuAction::parse("5s", &catalog),
            MenuAction::Timeframe(Timeframe::S5)
        );
        assert_eq!(
            MenuAction::parse("1h", &catalog),
            MenuAction::Timeframe(Timeframe::H1)
        );
    }

    #[test]
    fn test_parse_instruments() {
        let catalog = InstrumentCatalog::new();

        match MenuAction::parse("EUR/USD OTC", &catalog) {
            MenuAction::Instrument(instrument) => {
                assert!(instrument.is_otc());
                assert_eq!(instrument.pair(), "EUR/USD");
            }
            other => panic!("Expected instrument, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_is_exact() {
        let catalog = InstrumentCatalog::new();

        for text in ["", "/START", "/started", "/startx", "назад", " 5m", "eur/usd", "EUR/USD  OTC", "hello"] {
            assert_eq!(MenuAction::parse(text, &catalog), MenuAction::Unknown, "{text:?}");
        }
    }
}
