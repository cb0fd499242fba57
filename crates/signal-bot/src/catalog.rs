//! Instrument catalog
//!
//! The fixed set of tradable currency pairs, their OTC variants, and the
//! timeframes each class of instrument may be analyzed on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker appended to a pair's display id to form its OTC variant
pub const OTC_SUFFIX: &str = " OTC";

const PAIR_SEPARATOR: char = '/';

/// Standard pairs, in menu order
const FOREX_PAIRS: [&str; 20] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "USD/CHF", "AUD/USD",
    "NZD/USD", "USD/CAD", "EUR/GBP", "EUR/JPY", "GBP/JPY",
    "AUD/JPY", "CHF/JPY", "EUR/AUD", "EUR/CAD", "GBP/AUD",
    "GBP/CAD", "AUD/CAD", "NZD/JPY", "EUR/NZD", "GBP/NZD",
];

/// Timeframes offered for standard pairs
pub const STANDARD_TIMEFRAMES: &[Timeframe] = &[
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
];

/// Timeframes offered for OTC pairs
pub const OTC_TIMEFRAMES: &[Timeframe] = &[
    Timeframe::S5,
    Timeframe::S10,
    Timeframe::S30,
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::M30,
    Timeframe::H1,
];

/// Timeframe label a user can pick from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    S5,
    S10,
    S30,
    M1,
    M5,
    M15,
    M30,
    H1,
}

impl Timeframe {
    /// Every known label, standard or OTC
    pub const ALL: [Timeframe; 8] = [
        Timeframe::S5,
        Timeframe::S10,
        Timeframe::S30,
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
    ];

    /// Menu label for this timeframe
    pub fn label(self) -> &'static str {
        match self {
            Self::S5 => "5s",
            Self::S10 => "10s",
            Self::S30 => "30s",
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
        }
    }

    /// Resolve a label by exact match
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tf| tf.label() == label)
    }

    /// Interval requested from the analysis feed.
    ///
    /// The feed has nothing below one minute, so sub-minute labels are
    /// analyzed on the 1-minute interval.
    pub fn interval(self) -> AnalysisInterval {
        match self {
            Self::S5 | Self::S10 | Self::S30 | Self::M1 => AnalysisInterval::OneMinute,
            Self::M5 => AnalysisInterval::FiveMinutes,
            Self::M15 => AnalysisInterval::FifteenMinutes,
            Self::M30 => AnalysisInterval::ThirtyMinutes,
            Self::H1 => AnalysisInterval::OneHour,
        }
    }

    /// Timeframes valid for the given instrument class
    pub fn valid_for(is_otc: bool) -> &'static [Timeframe] {
        if is_otc {
            OTC_TIMEFRAMES
        } else {
            STANDARD_TIMEFRAMES
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Candle interval understood by the analysis feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisInterval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
}

impl AnalysisInterval {
    /// Column suffix used by the scanner API
    pub fn scanner_suffix(self) -> &'static str {
        match self {
            Self::OneMinute => "|1",
            Self::FiveMinutes => "|5",
            Self::FifteenMinutes => "|15",
            Self::ThirtyMinutes => "|30",
            Self::OneHour => "|60",
        }
    }
}

impl fmt::Display for AnalysisInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
        };
        f.write_str(label)
    }
}

/// A tradable pair, either the standard instrument or its OTC variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instrument {
    pair: &'static str,
    is_otc: bool,
}

impl Instrument {
    /// Base pair, e.g. `EUR/USD`
    pub fn pair(&self) -> &'static str {
        self.pair
    }

    pub fn is_otc(&self) -> bool {
        self.is_otc
    }

    /// Display id as shown on the menu, e.g. `EUR/USD OTC`
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Symbol requested from the analysis feed.
    ///
    /// OTC instruments have no feed of their own and are analyzed through
    /// the standard pair.
    pub fn feed_symbol(&self) -> String {
        feed_symbol(self.pair)
    }

    /// Timeframes valid for this instrument
    pub fn timeframes(&self) -> &'static [Timeframe] {
        Timeframe::valid_for(self.is_otc)
    }

    pub fn accepts(&self, timeframe: Timeframe) -> bool {
        self.timeframes().contains(&timeframe)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_otc {
            write!(f, "{}{OTC_SUFFIX}", self.pair)
        } else {
            f.write_str(self.pair)
        }
    }
}

/// Map a display id to the analysis feed symbol: `EUR/USD OTC` -> `EURUSD`
pub fn feed_symbol(display_id: &str) -> String {
    let base = display_id.strip_suffix(OTC_SUFFIX).unwrap_or(display_id);
    base.chars().filter(|c| *c != PAIR_SEPARATOR).collect()
}

/// The two disjoint instrument catalogs
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    standard: Vec<Instrument>,
    otc: Vec<Instrument>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InstrumentCatalog {
    /// Build the catalog of forex pairs and their OTC variants
    pub fn new() -> Self {
        let standard = FOREX_PAIRS
            .into_iter()
            .map(|pair| Instrument { pair, is_otc: false })
            .collect();
        let otc = FOREX_PAIRS
            .into_iter()
            .map(|pair| Instrument { pair, is_otc: true })
            .collect();

        Self { standard, otc }
    }

    pub fn standard(&self) -> &[Instrument] {
        &self.standard
    }

    pub fn otc(&self) -> &[Instrument] {
        &self.otc
    }

    /// Instruments of one class
    pub fn instruments(&self, is_otc: bool) -> &[Instrument] {
        if is_otc { &self.otc } else { &self.standard }
    }

    /// Resolve a display id by exact match against both catalogs
    pub fn find(&self, id: &str) -> Option<Instrument> {
        self.standard
            .iter()
            .chain(self.otc.iter())
            .find(|instrument| instrument.to_string() == id)
            .copied()
    }

    /// Whether the catalog holds exactly this instrument
    pub fn contains(&self, instrument: &Instrument) -> bool {
        self.instruments(instrument.is_otc).contains(instrument)
    }
}
