//! Selection state machine
//!
//! Per user the flow is `Idle -> InstrumentSelected -> signal`. After a
//! signal the user stays on the selected instrument and may pick another
//! timeframe, select a new instrument, or go back to the menu. Going back
//! does not erase the stored selection.

use super::coercion::{CoercionStage, EntropySource, Signal, SignalCoercer};
use crate::api::AnalysisProvider;
use crate::catalog::{Instrument, InstrumentCatalog, Timeframe};
use crate::error::SignalError;
use crate::interface::{InMemorySessionStore, SessionStore, UserId, UserSession};
use crate::market::{MarketClock, SystemClock, is_market_closed};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A coerced signal for one instrument and timeframe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalResult {
    pub instrument: Instrument,
    pub timeframe: Timeframe,
    pub signal: Signal,
    pub stage: CoercionStage,
    pub generated_at: DateTime<Utc>,
}

/// Result of a timeframe choice
#[derive(Debug)]
pub enum SelectionOutcome {
    /// Analysis succeeded
    Signal(SignalResult),

    /// Standard instrument outside trading hours; no analysis was requested
    MarketClosed { instrument: Instrument },

    /// The user has not selected an instrument yet
    NoActiveSelection,

    /// The timeframe is not offered for the selected instrument
    Rejected {
        instrument: Instrument,
        timeframe: Timeframe,
    },

    /// The analysis feed failed; the selection is kept
    AnalysisFailed {
        instrument: Instrument,
        timeframe: Timeframe,
        error: SignalError,
    },
}

impl SelectionOutcome {
    /// The signal, if one was produced
    pub fn signal(&self) -> Option<Signal> {
        match self {
            Self::Signal(result) => Some(result.signal),
            _ => None,
        }
    }
}

/// Decision-and-session engine
pub struct SignalEngine {
    catalog: Arc<InstrumentCatalog>,
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn AnalysisProvider>,
    clock: Arc<dyn MarketClock>,
    coercer: SignalCoercer,
}

impl SignalEngine {
    /// Create an engine with an in-memory session store, the system clock
    /// and random tie-breaking
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            catalog: Arc::new(InstrumentCatalog::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            provider,
            clock: Arc::new(SystemClock),
            coercer: SignalCoercer::default(),
        }
    }

    /// Use a specific session store
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Use a specific clock
    pub fn with_clock(mut self, clock: Arc<dyn MarketClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a specific entropy source for full-equilibrium reports
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.coercer = SignalCoercer::new(entropy);
        self
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    /// Current selection for a user
    pub fn session(&self, user_id: UserId) -> Option<UserSession> {
        self.sessions.get(user_id)
    }

    /// Select an instrument, overwriting any previous selection.
    ///
    /// Instruments outside the catalog are ignored.
    pub fn select_instrument(&self, user_id: UserId, instrument: Instrument) -> Option<UserSession> {
        if !self.catalog.contains(&instrument) {
            debug!(user_id, instrument = %instrument, "Ignoring instrument outside the catalog");
            return None;
        }

        let session = UserSession::new(instrument);
        self.sessions.put(user_id, session);
        info!(user_id, instrument = %instrument, "Instrument selected");
        Some(session)
    }

    /// Select an instrument by display id.
    ///
    /// Ids outside the catalog are ignored and leave the session untouched.
    pub fn select_by_id(&self, user_id: UserId, id: &str) -> Option<UserSession> {
        let Some(instrument) = self.catalog.find(id) else {
            debug!(user_id, id, "Ignoring unknown instrument");
            return None;
        };
        self.select_instrument(user_id, instrument)
    }

    /// Choose a timeframe for the current selection and produce a signal
    pub async fn choose_timeframe(&self, user_id: UserId, timeframe: Timeframe) -> SelectionOutcome {
        let Some(session) = self.sessions.get(user_id) else {
            debug!(user_id, %timeframe, "Timeframe chosen without a selection");
            return SelectionOutcome::NoActiveSelection;
        };
        let instrument = session.instrument;

        if !self.catalog.contains(&instrument) || !instrument.accepts(timeframe) {
            debug!(user_id, instrument = %instrument, %timeframe, "Rejecting timeframe");
            return SelectionOutcome::Rejected {
                instrument,
                timeframe,
            };
        }

        if !instrument.is_otc() && is_market_closed(&self.clock.now()) {
            info!(user_id, instrument = %instrument, %timeframe, "Market closed");
            return SelectionOutcome::MarketClosed { instrument };
        }

        let symbol = instrument.feed_symbol();
        let interval = timeframe.interval();

        match self.provider.fetch_report(&symbol, interval).await {
            Ok(report) => {
                let coercion = self.coercer.coerce_with_stage(&report);
                info!(
                    user_id,
                    instrument = %instrument,
                    %timeframe,
                    signal = %coercion.signal,
                    stage = ?coercion.stage,
                    "Signal generated"
                );
                SelectionOutcome::Signal(SignalResult {
                    instrument,
                    timeframe,
                    signal: coercion.signal,
                    stage: coercion.stage,
                    generated_at: Utc::now(),
                })
            }
            Err(err) => {
                error!(
                    user_id,
                    instrument = %instrument,
                    %timeframe,
                    symbol = %symbol,
                    %interval,
                    error = %err,
                    "Analysis failed"
                );
                SelectionOutcome::AnalysisFailed {
                    instrument,
                    timeframe,
                    error: err,
                }
            }
        }
    }
}
