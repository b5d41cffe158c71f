//! Decisions behind as-you-type input handling.
//!
//! Each function takes the field's current value (and the character being
//! typed, where relevant) and either says whether the key should be accepted
//! or returns the value the field should hold next. `None` means "leave the
//! default behaviour alone". Cursor placement stays with the caller.

use crate::core::classifier::classify;
use crate::utils::text::{digits_only, replace_full_width_digits};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on digits for numbers with no recognised network.
const UNKNOWN_MAX_LENGTH: usize = 16;
const MAX_EXPIRY_DIGITS: usize = 6;
const MAX_CVC_LENGTH: usize = 4;

pub const UNKNOWN_NETWORK: &str = "unknown";

static GROUP_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)[0-9]{4}$").expect("static regex is valid"));
static AMEX_GROUP_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{4}|[0-9]{4}\s[0-9]{6})$").expect("static regex is valid"));
static DIGIT_SPACE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]\s$").expect("static regex is valid"));
static SPACE_DIGIT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s[0-9]?$").expect("static regex is valid"));
static EXPIRY_SEPARATOR_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]\s/\s$").expect("static regex is valid"));

/// Digits and control keys are allowed in numeric fields; a plain space is not.
pub fn restrict_numeric(ch: char) -> bool {
    match ch {
        ' ' => false,
        c if (c as u32) < 33 => true,
        c => c.is_ascii_digit() || c.is_whitespace(),
    }
}

/// Whether typing `ch` keeps the number within its network's maximum length.
pub fn restrict_card_number(value: &str, ch: char) -> bool {
    if !ch.is_ascii_digit() {
        return true;
    }
    let digits = digits_only(&format!("{}{}", value, ch));
    digits.len() <= max_length_for(&digits)
}

pub fn restrict_expiry(value: &str, ch: char) -> bool {
    if !ch.is_ascii_digit() {
        return true;
    }
    digits_only(value).len() < MAX_EXPIRY_DIGITS
}

pub fn restrict_cvc(value: &str, ch: char) -> bool {
    if !ch.is_ascii_digit() {
        return true;
    }
    value.chars().count() < MAX_CVC_LENGTH
}

/// Inserts a group separator when the typed digit starts or completes a group.
pub fn card_number_on_digit(value: &str, ch: char) -> Option<String> {
    if !ch.is_ascii_digit() {
        return None;
    }

    let candidate = format!("{}{}", value, ch);
    let digits = digits_only(&candidate);
    if digits.len() >= max_length_for(&digits) {
        return None;
    }

    let pattern = match classify(&digits) {
        Some(rule) if rule.network_id == "amex" => &*AMEX_GROUP_END,
        _ => &*GROUP_END,
    };

    if pattern.is_match(value) {
        // "4242" + 4 => "4242 4"
        Some(format!("{} {}", value, ch))
    } else if pattern.is_match(&candidate) {
        // "424" + 2 => "4242 "
        Some(format!("{} ", candidate))
    } else {
        None
    }
}

/// Backspace at the end of a grouped number removes the digit together with
/// a dangling separator.
pub fn card_number_on_backspace(value: &str) -> Option<String> {
    if DIGIT_SPACE_END.is_match(value) {
        Some(DIGIT_SPACE_END.replace(value, "").into_owned())
    } else if SPACE_DIGIT_END.is_match(value) {
        Some(value.strip_suffix(|c: char| c.is_ascii_digit()).unwrap_or(value).to_string())
    } else {
        None
    }
}

/// Eager expiry completion while typing the month.
pub fn expiry_on_digit(value: &str, ch: char) -> Option<String> {
    if !ch.is_ascii_digit() {
        return None;
    }

    let candidate = format!("{}{}", value, ch);
    match candidate.as_bytes() {
        [d] if *d != b'0' && *d != b'1' => Some(format!("0{} / ", candidate)),
        [m1, m2] if m1.is_ascii_digit() => {
            // no month has a second digit above 2, so "13" means 01 / 3
            if *m2 > b'2' && *m1 != b'0' {
                Some(format!("0{} / {}", *m1 as char, *m2 as char))
            } else {
                Some(format!("{} / ", candidate))
            }
        }
        _ => None,
    }
}

/// Typing a digit after a complete two-digit month inserts the separator first.
pub fn expiry_on_forward(value: &str, ch: char) -> Option<String> {
    if !ch.is_ascii_digit() {
        return None;
    }
    match value.as_bytes() {
        [m1, m2] if m1.is_ascii_digit() && m2.is_ascii_digit() => Some(format!("{} / ", value)),
        _ => None,
    }
}

/// Typing `/` or a space after a lone month digit completes the month.
pub fn expiry_on_separator(value: &str, ch: char) -> Option<String> {
    if ch != '/' && ch != ' ' {
        return None;
    }
    match value.as_bytes() {
        [d] if d.is_ascii_digit() && *d != b'0' => Some(format!("0{} / ", value)),
        _ => None,
    }
}

/// Backspace right after `"MM / "` removes the separator and the last month digit.
pub fn expiry_on_backspace(value: &str) -> Option<String> {
    if EXPIRY_SEPARATOR_END.is_match(value) {
        Some(EXPIRY_SEPARATOR_END.replace(value, "").into_owned())
    } else {
        None
    }
}

/// Normalises pasted input for a plain numeric field to ASCII digits.
pub fn reformat_numeric(value: &str) -> String {
    digits_only(&replace_full_width_digits(value))
}

/// Normalises pasted CVC input to at most four ASCII digits.
pub fn reformat_cvc(value: &str) -> String {
    reformat_numeric(value)
        .chars()
        .take(MAX_CVC_LENGTH)
        .collect()
}

/// The network id, or `"unknown"` for display purposes.
pub fn network_label(raw: &str) -> &'static str {
    classify(raw).map_or(UNKNOWN_NETWORK, |rule| rule.network_id)
}

fn max_length_for(digits: &str) -> usize {
    classify(digits)
        .and_then(|rule| rule.max_length())
        .unwrap_or(UNKNOWN_MAX_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restrict_numeric() {
        assert!(restrict_numeric('7'));
        assert!(!restrict_numeric(' '));
        assert!(restrict_numeric('\t'));
        assert!(restrict_numeric('\u{8}'));
        assert!(!restrict_numeric('a'));
        assert!(!restrict_numeric('/'));
    }

    #[test]
    fn test_restrict_card_number() {
        assert!(restrict_card_number("4242 4242 4242 424", '2'));
        assert!(!restrict_card_number("4242 4242 4242 4242", '4'));
        // unionpay goes to 19
        assert!(restrict_card_number("6200 0000 0000 0000 00", '0'));
        assert!(!restrict_card_number("9999 9999 9999 9999", '9'));
        assert!(restrict_card_number("4242 4242 4242 4242", 'x'));
    }

    #[test]
    fn test_restrict_expiry_and_cvc() {
        assert!(restrict_expiry("12 / 202", '8'));
        assert!(!restrict_expiry("12 / 2028", '1'));
        assert!(restrict_cvc("123", '4'));
        assert!(!restrict_cvc("1234", '5'));
    }

    #[test]
    fn test_card_number_on_digit() {
        assert_eq!(card_number_on_digit("424", '2'), Some("4242 ".to_string()));
        assert_eq!(card_number_on_digit("4242", '4'), Some("4242 4".to_string()));
        assert_eq!(card_number_on_digit("4242 424", '2'), Some("4242 4242 ".to_string()));
        assert_eq!(card_number_on_digit("42", '4'), None);
        assert_eq!(card_number_on_digit("42", 'a'), None);
        // last digit: no trailing separator
        assert_eq!(card_number_on_digit("4242 4242 4242 424", '2'), None);
    }

    #[test]
    fn test_card_number_on_digit_amex() {
        assert_eq!(card_number_on_digit("378", '2'), Some("3782 ".to_string()));
        assert_eq!(card_number_on_digit("3782 82246", '3'), Some("3782 822463 ".to_string()));
        assert_eq!(card_number_on_digit("3782 8224", '6'), None);
    }

    #[test]
    fn test_card_number_on_backspace() {
        assert_eq!(card_number_on_backspace("4242 "), Some("424".to_string()));
        assert_eq!(card_number_on_backspace("4242 4"), Some("4242 ".to_string()));
        assert_eq!(card_number_on_backspace("4242 42"), None);
    }

    #[test]
    fn test_expiry_on_digit() {
        assert_eq!(expiry_on_digit("", '2'), Some("02 / ".to_string()));
        assert_eq!(expiry_on_digit("", '1'), None);
        assert_eq!(expiry_on_digit("", '0'), None);
        assert_eq!(expiry_on_digit("0", '1'), Some("01 / ".to_string()));
        assert_eq!(expiry_on_digit("1", '2'), Some("12 / ".to_string()));
        assert_eq!(expiry_on_digit("1", '3'), Some("01 / 3".to_string()));
        assert_eq!(expiry_on_digit("0", '9'), Some("09 / ".to_string()));
        assert_eq!(expiry_on_digit("12 / ", '2'), None);
    }

    #[test]
    fn test_expiry_on_forward() {
        assert_eq!(expiry_on_forward("12", '3'), Some("12 / ".to_string()));
        assert_eq!(expiry_on_forward("05", '2'), Some("05 / ".to_string()));
        assert_eq!(expiry_on_forward("12", '/'), None);
        assert_eq!(expiry_on_forward("1", '2'), None);
        assert_eq!(expiry_on_forward("12 / ", '2'), None);
    }

    #[test]
    fn test_expiry_on_separator_and_backspace() {
        assert_eq!(expiry_on_separator("3", '/'), Some("03 / ".to_string()));
        assert_eq!(expiry_on_separator("1", ' '), Some("01 / ".to_string()));
        assert_eq!(expiry_on_separator("0", '/'), None);
        assert_eq!(expiry_on_separator("12", '/'), None);
        assert_eq!(expiry_on_backspace("12 / "), Some("1".to_string()));
        assert_eq!(expiry_on_backspace("12 / 2"), None);
    }

    #[test]
    fn test_reformat_cvc_and_label() {
        assert_eq!(reformat_cvc("１２a3 45"), "1234");
        assert_eq!(reformat_numeric("０１-２3 x4"), "01234");
        assert_eq!(reformat_numeric(""), "");
        assert_eq!(network_label("4242"), "visa");
        assert_eq!(network_label("0000"), UNKNOWN_NETWORK);
    }
}
