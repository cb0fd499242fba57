//! Typed model of a technical-analysis report
//!
//! The upstream feed is heterogeneous: any recommendation may be missing or
//! carry an unexpected value. Each field is therefore optional, and parsing a
//! raw value never fails.

use crate::catalog::AnalysisInterval;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Five-level recommendation reported by the analysis feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// Parse a raw recommendation label, case-insensitively.
    ///
    /// Unknown labels yield `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STRONG_BUY" => Some(Self::StrongBuy),
            "BUY" => Some(Self::Buy),
            "NEUTRAL" => Some(Self::Neutral),
            "SELL" => Some(Self::Sell),
            "STRONG_SELL" => Some(Self::StrongSell),
            _ => None,
        }
    }

    /// Map an aggregate score in `[-1, 1]` to a recommendation
    pub fn from_score(score: f64) -> Option<Self> {
        if !(-1.0..=1.0).contains(&score) {
            return None;
        }

        let rec = if score < -0.5 {
            Self::StrongSell
        } else if score < -0.1 {
            Self::Sell
        } else if score <= 0.1 {
            Self::Neutral
        } else if score <= 0.5 {
            Self::Buy
        } else {
            Self::StrongBuy
        };
        Some(rec)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of indicators with an aggregate recommendation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorGroup {
    /// Aggregate recommendation for the group, if the feed provided one
    pub recommendation: Option<Recommendation>,

    /// Raw per-indicator votes keyed by indicator name
    pub votes: BTreeMap<String, String>,
}

impl IndicatorGroup {
    pub fn with_recommendation(recommendation: Option<Recommendation>) -> Self {
        Self {
            recommendation,
            votes: BTreeMap::new(),
        }
    }

    /// Add a raw vote
    pub fn with_vote(mut self, indicator: impl Into<String>, vote: impl Into<String>) -> Self {
        self.votes.insert(indicator.into(), vote.into());
        self
    }
}

/// Multi-indicator analysis of one symbol on one interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Feed symbol the report was computed for
    pub symbol: String,

    pub interval: Option<AnalysisInterval>,

    /// Overall recommendation
    pub summary: Option<Recommendation>,

    /// Trend-following indicators (moving averages)
    pub moving_averages: IndicatorGroup,

    /// Oscillator indicators
    pub oscillators: IndicatorGroup,
}

impl AnalysisReport {
    /// An empty report: every field absent
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: AnalysisInterval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_summary(mut self, summary: Option<Recommendation>) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_moving_averages(mut self, group: IndicatorGroup) -> Self {
        self.moving_averages = group;
        self
    }

    pub fn with_oscillators(mut self, group: IndicatorGroup) -> Self {
        self.oscillators = group;
        self
    }
}
