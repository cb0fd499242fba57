//! Bot platform interfaces
//!
//! Platform-agnostic reply types, session storage and reply formatting

pub mod formatter;
pub mod message;
pub mod session;

pub use formatter::Formatter;
pub use message::{BotResponse, Keyboard};
pub use session::{InMemorySessionStore, SessionStore, UserId, UserSession};
