//! The built-in card network table.
//!
//! Order matters: classification returns the first rule with a matching
//! prefix, so e.g. maestro's `5018` must come before mastercard's `51`-`55`
//! and dankort's `5019` is only reachable because maestro does not list it.

use crate::domain::model::{CardRule, GroupingPattern};
use crate::utils::error::{CardError, Result};
use std::collections::HashSet;

const GROUPS_OF_FOUR: GroupingPattern = GroupingPattern::Repeating(4);

pub static CARD_RULES: [CardRule; 10] = [
    CardRule {
        network_id: "maestro",
        prefix_patterns: &["5018", "502", "503", "506", "56", "58", "639", "6220", "67", "633"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "forbrugsforeningen",
        prefix_patterns: &["600"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "dankort",
        prefix_patterns: &["5019"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    // Credit cards
    CardRule {
        network_id: "visa",
        prefix_patterns: &["4"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[13, 16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "mastercard",
        prefix_patterns: &["51", "52", "53", "54", "55", "22", "23", "24", "25", "26", "27"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "amex",
        prefix_patterns: &["34", "37"],
        grouping: GroupingPattern::Fixed(&[4, 6, 5]),
        valid_lengths: &[15, 16],
        valid_cvc_lengths: &[3, 4],
        requires_luhn: true,
    },
    CardRule {
        network_id: "dinersclub",
        prefix_patterns: &["30", "36", "38", "39"],
        grouping: GroupingPattern::Fixed(&[4, 6, 4]),
        valid_lengths: &[14],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "discover",
        prefix_patterns: &["60", "64", "65", "622"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
    CardRule {
        network_id: "unionpay",
        prefix_patterns: &["62", "88"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16, 17, 18, 19],
        valid_cvc_lengths: &[3],
        requires_luhn: false,
    },
    CardRule {
        network_id: "jcb",
        prefix_patterns: &["35"],
        grouping: GROUPS_OF_FOUR,
        valid_lengths: &[16],
        valid_cvc_lengths: &[3],
        requires_luhn: true,
    },
];

pub fn card_rules() -> &'static [CardRule] {
    &CARD_RULES
}

fn rule_error(rule: &CardRule, reason: &str) -> CardError {
    CardError::RuleTableError {
        network: rule.network_id.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks the structural invariants every rule table must hold.
pub fn validate_rule_table(rules: &[CardRule]) -> Result<()> {
    let mut seen = HashSet::new();

    for rule in rules {
        if rule.network_id.is_empty() {
            return Err(rule_error(rule, "network id is empty"));
        }
        if !seen.insert(rule.network_id) {
            return Err(rule_error(rule, "network id is listed twice"));
        }
        if rule.prefix_patterns.is_empty() {
            return Err(rule_error(rule, "no prefix patterns"));
        }
        if rule
            .prefix_patterns
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(rule_error(rule, "prefix patterns must be non-empty digit strings"));
        }
        if rule.valid_lengths.is_empty() {
            return Err(rule_error(rule, "no valid lengths"));
        }
        if rule.valid_lengths.windows(2).any(|w| w[0] >= w[1]) {
            return Err(rule_error(rule, "valid lengths must be strictly ascending"));
        }
        if rule.valid_cvc_lengths.is_empty() {
            return Err(rule_error(rule, "no valid CVC lengths"));
        }
        match rule.grouping {
            GroupingPattern::Repeating(0) => {
                return Err(rule_error(rule, "group size must be positive"));
            }
            GroupingPattern::Fixed(sizes) if sizes.is_empty() || sizes.contains(&0) => {
                return Err(rule_error(rule, "fixed groups must be non-empty and positive"));
            }
            _ => {}
        }
    }

    Ok(())
}
