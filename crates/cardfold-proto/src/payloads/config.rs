//! Room configuration payloads.

use serde::{Deserialize, Serialize};

/// One estimation card: a display label and the value it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Display label, e.g. `"13"` or `"?"`.
    pub label: String,

    /// Numeric value submitted when the card is played.
    pub value: f64,

    /// Optional display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Card {
    /// Create a card without a display color.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value, color: None }
    }
}

/// The room's card configuration was replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfigSet {
    /// The new ordered card deck.
    pub card_config: Vec<Card>,
}
