//! Chat platform transports

pub mod telegram;

pub use telegram::{TelegramBot, TelegramConfig, reply_keyboard};
