use crate::core::cards::card_rules;
use crate::core::classifier::classify_in;
use crate::domain::model::GroupingPattern;
use crate::utils::text::digits_only;
use once_cell::sync::Lazy;
use regex::Regex;

static EXPIRY_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^0-9]*([0-9]{1,2})([^0-9]+)?([0-9]{1,4})?").expect("static regex is valid")
});

/// Groups a card number for display, e.g. `"4242 4242 4242 4242"`.
///
/// Numbers with no known network are returned as bare digits.
pub fn format_number(raw: &str) -> String {
    let digits = digits_only(raw);
    let Some(rule) = classify_in(card_rules(), &digits) else {
        return digits;
    };

    let digits = match rule.max_length() {
        Some(max) if digits.len() > max => &digits[..max],
        _ => digits.as_str(),
    };

    group_digits(digits, rule.grouping).join(" ")
}

/// Splits ASCII digits into display groups. Unfilled fixed groups are
/// dropped, as are digits past the last fixed group.
fn group_digits(digits: &str, grouping: GroupingPattern) -> Vec<&str> {
    match grouping {
        GroupingPattern::Repeating(size) => {
            let size = size.max(1);
            (0..digits.len())
                .step_by(size)
                .map(|start| &digits[start..(start + size).min(digits.len())])
                .collect()
        }
        GroupingPattern::Fixed(sizes) => {
            let mut groups = Vec::with_capacity(sizes.len());
            let mut rest = digits;
            for &size in sizes {
                if rest.is_empty() {
                    break;
                }
                let (group, tail) = rest.split_at(size.min(rest.len()));
                groups.push(group);
                rest = tail;
            }
            groups
        }
    }
}

/// Re-renders typed expiry input as `"MM / YY"`, tolerating partial input.
pub fn format_expiry(raw: &str) -> String {
    let Some(parts) = EXPIRY_PARTS.captures(raw) else {
        return String::new();
    };

    let mut month = parts.get(1).map_or("", |m| m.as_str()).to_string();
    let mut separator = parts.get(2).map_or("", |m| m.as_str());
    let year = parts.get(3).map_or("", |m| m.as_str());

    if !year.is_empty() {
        separator = " / ";
    } else if separator == " /" {
        // backspacing through the separator
        month.truncate(1);
        separator = "";
    } else if month.len() == 2 || !separator.is_empty() {
        separator = " / ";
    } else if month.len() == 1 && month != "0" && month != "1" {
        month.insert(0, '0');
        separator = " / ";
    }

    format!("{}{}{}", month, separator, year)
}
