//! Telegram transport
//!
//! Long-polls the Bot API through teloxide and hands each text message to
//! the [`SignalBot`]. Updates from one chat are handled in order; different
//! chats run concurrently.

use crate::bot::SignalBot;
use crate::error::{Result, SignalError};
use crate::interface::{BotResponse, Keyboard};
use signal_utils::EnvSource;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::update_listeners::Polling;
use tracing::{debug, error, info};

/// Headroom over the long-poll timeout before the HTTP client gives up
const REQUEST_GRACE: Duration = Duration::from_secs(10);

/// Telegram bot configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,

    /// Bot API server; `None` uses api.telegram.org
    pub api_base: Option<String>,

    /// Long-poll timeout for `getUpdates`
    pub poll_timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: None,
            poll_timeout: Duration::from_secs(30),
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(&signal_utils::ProcessEnv)
    }

    /// Create config from any environment source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let mut config = Self::new(env.required("TELEGRAM_TOKEN")?);
        config.api_base = env.optional("TELEGRAM_API_BASE");

        if let Some(secs) = env.parsed("TELEGRAM_POLL_TIMEOUT_SECS")? {
            config.poll_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the long-poll timeout
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(SignalError::ConfigError("TELEGRAM_TOKEN not set".to_string()));
        }
        if let Some(api_base) = &self.api_base {
            reqwest::Url::parse(api_base).map_err(|e| {
                SignalError::ConfigError(format!("invalid TELEGRAM_API_BASE {api_base:?}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Build a teloxide client whose HTTP timeout outlasts the long poll
    fn bot(&self) -> Result<Bot> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(self.poll_timeout + REQUEST_GRACE)
            .build()
            .map_err(|e| SignalError::TelegramError(e.to_string()))?;

        let mut bot = Bot::with_client(&self.token, client);
        if let Some(api_base) = &self.api_base {
            let url = reqwest::Url::parse(api_base)
                .map_err(|e| SignalError::ConfigError(e.to_string()))?;
            bot = bot.set_api_url(url);
        }
        Ok(bot)
    }
}

/// Reply keyboard for a response
pub fn reply_keyboard(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>());
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Telegram bot
pub struct TelegramBot {
    config: TelegramConfig,
    bot: Bot,
    signals: Arc<SignalBot>,
}

impl TelegramBot {
    pub fn new(config: TelegramConfig, signals: SignalBot) -> Result<Self> {
        let bot = config.bot()?;
        Ok(Self {
            config,
            bot,
            signals: Arc::new(signals),
        })
    }

    /// Poll for updates until ctrl-c
    pub async fn run(self) {
        info!(poll_timeout = ?self.config.poll_timeout, "Telegram bot started");

        let listener = Polling::builder(self.bot.clone())
            .timeout(self.config.poll_timeout)
            .build();
        let handler = Update::filter_message().endpoint(on_message);

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.signals])
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("Polling failed"),
            )
            .await;

        info!("Telegram bot stopped");
    }
}

/// Sessions are keyed by chat; in a private chat that is the user
async fn on_message(bot: Bot, msg: Message, signals: Arc<SignalBot>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let Some(reply) = signals.handle(chat_id.0, text).await else {
        debug!(chat_id = chat_id.0, "No reply");
        return Ok(());
    };

    if let Err(e) = send_reply(&bot, chat_id, reply).await {
        error!(chat_id = chat_id.0, error = %e, "Failed to send reply");
    }
    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: BotResponse) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(reply_keyboard(&keyboard)).await?,
        None => request.await?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_config_from_source() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_POLL_TIMEOUT_SECS", "50"),
        ]);

        let config = assert_ok!(TelegramConfig::from_source(&env));
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.api_base, None);
        assert_eq!(config.poll_timeout, Duration::from_secs(50));
        assert!(!format!("{config:?}").contains("123:abc"));
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let env: HashMap<&str, &str> = HashMap::from([("TELEGRAM_TOKEN", "  ")]);
        let err = assert_err!(TelegramConfig::from_source(&env));
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_API_BASE", "not a url"),
        ]);
        let err = assert_err!(TelegramConfig::from_source(&env));
        assert!(matches!(err, SignalError::ConfigError(_)));
    }

    #[test]
    fn test_reply_keyboard_layout() {
        let keyboard = Keyboard::new().column(["5s", "1m"]).row(["Сменить пару", "Назад"]);
        let markup = serde_json::to_value(reply_keyboard(&keyboard)).unwrap();

        assert_eq!(markup["resize_keyboard"], json!(true));
        assert_eq!(markup["keyboard"][0][0]["text"], json!("5s"));
        assert_eq!(markup["keyboard"][2][1]["text"], json!("Назад"));
        assert_eq!(markup["keyboard"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_bot_builds_with_custom_server() {
        let config = TelegramConfig {
            api_base: Some("http://localhost:8081".to_string()),
            ..TelegramConfig::new("123:abc")
        };
        let bot = assert_ok!(config.bot());
        assert_eq!(bot.api_url().as_str(), "http://localhost:8081/");
    }
}
