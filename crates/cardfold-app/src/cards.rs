//! Card configuration lookup.
//!
//! Used only for log-message formatting: given a room's card deck and a
//! consensus value, find the matching display label.

use cardfold_proto::payloads::config::Card;

/// Display label for an estimate value, if the deck contains a matching card.
pub fn card_label(config: &[Card], value: f64) -> Option<&str> {
    config
        .iter()
        .find(|card| (card.value - value).abs() < f64::EPSILON)
        .map(|card| card.label.as_str())
}

/// The default deck used by rooms without a custom card configuration.
pub fn default_card_config() -> Vec<Card> {
    vec![
        Card::new("?", -2.0),
        Card::new("0", 0.0),
        Card::new("1/2", 0.5),
        Card::new("1", 1.0),
        Card::new("2", 2.0),
        Card::new("3", 3.0),
        Card::new("5", 5.0),
        Card::new("8", 8.0),
        Card::new("13", 13.0),
        Card::new("21", 21.0),
        Card::new("34", 34.0),
        Card::new("55", 55.0),
        Card::new("BIG", -1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup_matches_fractional_values() {
        let config = default_card_config();

        assert_eq!(card_label(&config, 0.5), Some("1/2"));
        assert_eq!(card_label(&config, 13.0), Some("13"));
        assert_eq!(card_label(&config, 99.0), None);
    }

    #[test]
    fn default_deck_has_unique_values() {
        let config = default_card_config();

        for (i, card) in config.iter().enumerate() {
            let duplicates =
                config.iter().skip(i + 1).filter(|c| (c.value - card.value).abs() < f64::EPSILON);
            assert_eq!(duplicates.count(), 0, "duplicate value for card {}", card.label);
        }
    }
}
