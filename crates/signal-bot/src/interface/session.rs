//! Per-user selection sessions

use crate::catalog::Instrument;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Chat user identifier
pub type UserId = i64;

/// The instrument a user last selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSession {
    pub instrument: Instrument,
    pub selected_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            selected_at: Utc::now(),
        }
    }

    pub fn is_otc(&self) -> bool {
        self.instrument.is_otc()
    }
}

/// Key-value storage of sessions by user.
///
/// Each call is atomic for its key. Concurrent writes to the same key
/// resolve as last write wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, user_id: UserId) -> Option<UserSession>;
    fn put(&self, user_id: UserId, session: UserSession);
}

/// Process-lifetime in-memory store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, UserSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a session
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: UserId) -> Option<UserSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .copied()
    }

    fn put(&self, user_id: UserId, session: UserSession) {
        match self.sessions.write() {
            Ok(mut sessions) => {
                sessions.insert(user_id, session);
            }
            Err(poisoned) => {
                tracing::warn!(user_id, "Session lock poisoned, recovering");
                poisoned.into_inner().insert(user_id, session);
            }
        }
    }
}
