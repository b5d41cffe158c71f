//! Boolean predicates for card number, expiry and CVC.
//!
//! None of these fail with an error: invalid input is simply `false` (or
//! `None` for classification), so UI callers can run them on every keystroke.

use crate::core::cards::card_rules;
use crate::core::classifier::{classify, classify_by_network_id, classify_in};
use crate::core::luhn::luhn_valid;
use crate::domain::model::ExpiryDate;
use crate::domain::ports::Clock;
use crate::utils::text::is_all_digits;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static COMBINED_EXPIRY_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s/]+").expect("static regex is valid"));

pub fn validate_number(raw: &str) -> bool {
    // only whitespace and hyphens are tolerated; any other character fails the digit test
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if !is_all_digits(&cleaned) {
        return false;
    }

    let Some(rule) = classify_in(card_rules(), &cleaned) else {
        return false;
    };

    rule.accepts_length(cleaned.len()) && (!rule.requires_luhn || luhn_valid(&cleaned))
}

/// Validates an expiry given either as `("MM", Some("YY[YY]"))` or as a
/// single combined string such as `"MM / YY"` with `year` absent or empty.
///
/// Two-digit years are expanded differently on the two paths: the combined
/// string borrows the current century, separate fields pivot at 70
/// (`70..=99` is 19xx, `00..=69` is 20xx).
pub fn validate_expiry<C: Clock + ?Sized>(month: &str, year: Option<&str>, clock: &C) -> bool {
    if month.is_empty() {
        return false;
    }

    let date = match year.filter(|y| !y.is_empty()) {
        Some(year) => normalize_parts(month, year),
        None => parse_expiry(month, clock),
    };

    date.is_some_and(|date| is_unexpired(date, clock.now()))
}

/// Validates a structured expiry. The fields go through the same checks as
/// the two-field form, so a year of `28` means 2028.
pub fn validate_expiry_date<C: Clock + ?Sized>(date: ExpiryDate, clock: &C) -> bool {
    validate_expiry(&date.month.to_string(), Some(&date.year.to_string()), clock)
}

/// Parses a combined expiry string without checking it against the clock
/// (other than to pick the century for a two-digit year).
pub fn parse_expiry<C: Clock + ?Sized>(combined: &str, clock: &C) -> Option<ExpiryDate> {
    split_combined(combined, clock.now().year()).and_then(|(m, y)| normalize_parts(&m, &y))
}

pub fn validate_cvc(cvc: &str, network_id: Option<&str>) -> bool {
    let cvc = cvc.trim();
    if !is_all_digits(cvc) {
        return false;
    }

    match network_id.and_then(classify_by_network_id) {
        Some(rule) => rule.accepts_cvc_length(cvc.len()),
        None => (3..=4).contains(&cvc.len()),
    }
}

pub fn card_network_of(raw: &str) -> Option<&'static str> {
    classify(raw).map(|rule| rule.network_id)
}

/// Splits `"MM/YY"`-ish input into month and year strings, each read as a
/// leading integer. A bare two-digit year gets the current century.
/// Tokens after the year are ignored.
fn split_combined(value: &str, current_year: i32) -> Option<(String, String)> {
    let mut tokens = COMBINED_EXPIRY_SEPARATOR.split(value);
    let month = tokens.next().unwrap_or_default();
    let year = tokens.next()?;
    let year = expand_year_shortcut(year, current_year).unwrap_or_else(|| year.to_string());

    let month = leading_int(month).filter(|m| *m != 0)?;
    let year = leading_int(&year).filter(|y| *y != 0)?;
    Some((month.to_string(), year.to_string()))
}

fn expand_year_shortcut(year: &str, current_year: i32) -> Option<String> {
    if year.len() == 2 && is_all_digits(year) {
        Some(format!("{}{}", current_year / 100, year))
    } else {
        None
    }
}

/// Reads an optional `+` followed by leading ASCII digits, ignoring the rest.
fn leading_int(token: &str) -> Option<u64> {
    let token = token.trim_start();
    let token = token.strip_prefix('+').unwrap_or(token);
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

fn normalize_parts(month: &str, year: &str) -> Option<ExpiryDate> {
    let month = month.trim();
    let year = year.trim();

    if !is_all_digits(month) || !is_all_digits(year) {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let year = if year.len() == 2 {
        let short: u32 = year.parse().ok()?;
        if short < 70 {
            format!("20{}", year)
        } else {
            format!("19{}", year)
        }
    } else {
        year.to_string()
    };

    if year.len() != 4 {
        return None;
    }

    Some(ExpiryDate::new(month, year.parse().ok()?))
}

/// A card is good through the last instant of its month, i.e. until
/// midnight on the first day of the following month.
fn is_unexpired(date: ExpiryDate, now: NaiveDateTime) -> bool {
    let (year, month) = if date.month == 12 {
        (date.year + 1, 1)
    } else {
        (date.year, date.month + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some_and(|expires_at| expires_at > now)
}
