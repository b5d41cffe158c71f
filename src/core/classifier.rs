use crate::core::cards::card_rules;
use crate::domain::model::CardRule;
use crate::utils::text::digits_only;

/// Finds the card network for a raw, possibly formatted, number.
///
/// Every non-digit is stripped first. Rules are tried in table order and the
/// first one with a literal prefix match wins.
pub fn classify(raw: &str) -> Option<&'static CardRule> {
    classify_in(card_rules(), &digits_only(raw))
}

/// Same as [`classify`] against an explicit table. `digits` must already be
/// cleaned.
pub fn classify_in<'a>(rules: &'a [CardRule], digits: &str) -> Option<&'a CardRule> {
    if digits.is_empty() {
        return None;
    }
    rules.iter().find(|rule| rule.matches_prefix(digits))
}

/// Exact, case-sensitive lookup by network id.
pub fn classify_by_network_id(id: &str) -> Option<&'static CardRule> {
    card_rules().iter().find(|rule| rule.network_id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(raw: &str) -> Option<&'static str> {
        classify(raw).map(|rule| rule.network_id)
    }

    #[test]
    fn test_classify_common_networks() {
        assert_eq!(network("4242424242424242"), Some("visa"));
        assert_eq!(network("5555555555554444"), Some("mastercard"));
        assert_eq!(network("2221000000000009"), Some("mastercard"));
        assert_eq!(network("378282246310005"), Some("amex"));
        assert_eq!(network("30569309025904"), Some("dinersclub"));
        assert_eq!(network("6011111111111117"), Some("discover"));
        assert_eq!(network("3530111333300000"), Some("jcb"));
        assert_eq!(network("6200000000000005"), Some("unionpay"));
    }

    #[test]
    fn test_table_order_resolves_overlaps() {
        // 5018 is maestro even though 5 also starts mastercard-looking ranges
        assert_eq!(network("5018000000000009"), Some("maestro"));
        assert_eq!(network("5019000000000000"), Some("dankort"));
        // 600 (forbrugsforeningen) before 60 (discover)
        assert_eq!(network("6007220000000004"), Some("forbrugsforeningen"));
        // 6220 (maestro) before 622 (discover) and 62 (unionpay)
        assert_eq!(network("6220000000000000"), Some("maestro"));
        assert_eq!(network("6221000000000000"), Some("discover"));
        assert_eq!(network("6230000000000000"), Some("unionpay"));
    }

    #[test]
    fn test_classify_strips_formatting() {
        assert_eq!(network("4242 4242-4242"), Some("visa"));
        assert_eq!(network(" 3782 822463 10005 "), Some("amex"));
    }

    #[test]
    fn test_unknown_prefixes() {
        assert_eq!(network("9999999999999999"), None);
        assert_eq!(network("1"), None);
        assert_eq!(network(""), None);
        assert_eq!(network("abc"), None);
        // a partial prefix is not a match
        assert_eq!(network("5"), None);
    }

    #[test]
    fn test_classify_by_network_id() {
        assert_eq!(
            classify_by_network_id("amex").map(|r| r.valid_cvc_lengths),
            Some(&[3usize, 4][..])
        );
        assert!(classify_by_network_id("Amex").is_none());
        assert!(classify_by_network_id("").is_none());
    }
}
