//! Signal engine
//!
//! Report model, the BUY/SELL coercion cascade and the per-user selection
//! state machine

pub mod coercion;
pub mod report;
pub mod signal_engine;

pub use coercion::{
    Coercion, CoercionStage, EntropySource, FixedEntropy, RandomEntropy, Signal, SignalCoercer,
};
pub use report::{AnalysisReport, IndicatorGroup, Recommendation};
pub use signal_engine::{SelectionOutcome, SignalEngine, SignalResult};
