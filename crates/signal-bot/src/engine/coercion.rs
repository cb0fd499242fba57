//! Signal coercion
//!
//! Forces a possibly-neutral analysis report into a binary BUY/SELL signal
//! through a fixed priority cascade:
//!
//! 1. overall recommendation
//! 2. moving-average recommendation
//! 3. oscillator recommendation
//! 4. tally of moving-average votes
//! 5. a draw from the injected [`EntropySource`]
//!
//! Each stage runs only when every earlier stage is inconclusive. The last
//! stage is total, so coercion never yields "no signal".

use super::report::{AnalysisReport, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Binary trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Short user-facing explanation
    pub fn explanation(self) -> &'static str {
        match self {
            Self::Buy => "📈 Импульс вверх: индикаторы подтверждают рост.",
            Self::Sell => "📉 Давление вниз: индикаторы подтверждают снижение.",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cascade stage that produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoercionStage {
    Summary,
    MovingAverages,
    Oscillators,
    VoteTally,
    Fallback,
}

/// A coerced signal together with the stage that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercion {
    pub signal: Signal,
    pub stage: CoercionStage,
}

/// Randomness used to break a full tie
pub trait EntropySource: Send + Sync {
    fn pick(&self) -> Signal;
}

/// Draws from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEntropy;

impl EntropySource for RandomEntropy {
    fn pick(&self) -> Signal {
        if rand::random::<bool>() {
            Signal::Buy
        } else {
            Signal::Sell
        }
    }
}

/// Always picks the same side
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub Signal);

impl EntropySource for FixedEntropy {
    fn pick(&self) -> Signal {
        self.0
    }
}

/// Two-sided test shared by the first three stages
fn directional(recommendation: Option<Recommendation>) -> Option<Signal> {
    match recommendation? {
        Recommendation::Buy | Recommendation::StrongBuy => Some(Signal::Buy),
        Recommendation::Sell | Recommendation::StrongSell => Some(Signal::Sell),
        Recommendation::Neutral => None,
    }
}

/// Majority of raw votes; a draw is inconclusive
fn tally_votes(votes: &BTreeMap<String, String>) -> Option<Signal> {
    let (mut buys, mut sells) = (0usize, 0usize);
    for vote in votes.values() {
        let vote = vote.to_ascii_uppercase();
        if vote.starts_with("BUY") {
            buys += 1;
        } else if vote.starts_with("SELL") {
            sells += 1;
        }
    }

    match buys.cmp(&sells) {
        std::cmp::Ordering::Greater => Some(Signal::Buy),
        std::cmp::Ordering::Less => Some(Signal::Sell),
        std::cmp::Ordering::Equal => None,
    }
}

/// Maps analysis reports to binary signals
#[derive(Clone)]
pub struct SignalCoercer {
    entropy: Arc<dyn EntropySource>,
}

impl Default for SignalCoercer {
    fn default() -> Self {
        Self::new(Arc::new(RandomEntropy))
    }
}

impl fmt::Debug for SignalCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalCoercer").finish_non_exhaustive()
    }
}

impl SignalCoercer {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Coerce a report into BUY or SELL
    pub fn coerce(&self, report: &AnalysisReport) -> Signal {
        self.coerce_with_stage(report).signal
    }

    /// Coerce a report, also reporting which stage decided
    pub fn coerce_with_stage(&self, report: &AnalysisReport) -> Coercion {
        let staged = [
            (CoercionStage::Summary, directional(report.summary)),
            (
                CoercionStage::MovingAverages,
                directional(report.moving_averages.recommendation),
            ),
            (
                CoercionStage::Oscillators,
                directional(report.oscillators.recommendation),
            ),
        ];

        if let Some(decided) = staged
            .into_iter()
            .find_map(|(stage, signal)| signal.map(|signal| Coercion { signal, stage }))
        {
            return decided;
        }

        if let Some(signal) = tally_votes(&report.moving_averages.votes) {
            return Coercion {
                signal,
                stage: CoercionStage::VoteTally,
            };
        }

        tracing::debug!(symbol = %report.symbol, "Report in full equilibrium, using fallback");
        Coercion {
            signal: self.entropy.pick(),
            stage: CoercionStage::Fallback,
        }
    }
}
