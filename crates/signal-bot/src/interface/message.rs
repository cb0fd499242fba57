//! Reply types for bot communication

use serde::{Deserialize, Serialize};

/// Rows of button labels shown under a reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of labels
    pub fn row<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Append one row per label
    pub fn column<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .extend(labels.into_iter().map(|label| vec![label.into()]));
        self
    }

    /// All labels, row by row
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }
}

/// Outbound reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotResponse {
    /// Reply text
    pub text: String,

    /// Keyboard to show; `None` leaves the current one in place
    pub keyboard: Option<Keyboard>,
}

impl BotResponse {
    /// Create a plain text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Attach a keyboard
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
