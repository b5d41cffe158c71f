use serde::{Deserialize, Serialize};
use std::fmt;

/// How a full card number is split into display groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPattern {
    /// Repeatedly take groups of up to `n` digits.
    Repeating(usize),
    /// A fixed sequence of group-size maxima, e.g. `[4, 6, 5]` for amex.
    Fixed(&'static [usize]),
}

/// One card network's numbering rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRule {
    pub network_id: &'static str,
    pub prefix_patterns: &'static [&'static str],
    pub grouping: GroupingPattern,
    pub valid_lengths: &'static [usize],
    pub valid_cvc_lengths: &'static [usize],
    pub requires_luhn: bool,
}

impl CardRule {
    /// Upper bound used when truncating typed input.
    pub fn max_length(&self) -> Option<usize> {
        self.valid_lengths.last().copied()
    }

    pub fn accepts_length(&self, length: usize) -> bool {
        self.valid_lengths.contains(&length)
    }

    pub fn accepts_cvc_length(&self, length: usize) -> bool {
        self.valid_cvc_lengths.contains(&length)
    }

    pub fn matches_prefix(&self, digits: &str) -> bool {
        self.prefix_patterns
            .iter()
            .any(|prefix| digits.starts_with(prefix))
    }
}

/// A card's printed expiry, valid through the last instant of `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryDate {
    pub month: u32,
    pub year: i32,
}

impl ExpiryDate {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02} / {:02}", self.month, self.year.rem_euclid(100))
    }
}

/// Combined result of checking one set of card fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCheck {
    pub network: Option<String>,
    pub last_four: String,
    pub formatted_number: String,
    pub number_valid: bool,
    pub formatted_expiry: Option<String>,
    pub expiry_valid: Option<bool>,
    pub cvc_valid: Option<bool>,
}

impl CardCheck {
    /// Every field that was supplied passed validation.
    pub fn is_valid(&self) -> bool {
        self.number_valid
            && self.expiry_valid.unwrap_or(true)
            && self.cvc_valid.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_display() {
        assert_eq!(ExpiryDate::new(3, 2028).to_string(), "03 / 28");
        assert_eq!(ExpiryDate::new(12, 2100).to_string(), "12 / 00");
    }

    #[test]
    fn test_card_check_validity_ignores_missing_fields() {
        let check = CardCheck {
            network: Some("visa".to_string()),
            last_four: "4242".to_string(),
            formatted_number: "4242 4242 4242 4242".to_string(),
            number_valid: true,
            formatted_expiry: None,
            expiry_valid: None,
            cvc_valid: Some(false),
        };
        assert!(!check.is_valid());
    }
}
