//! Small string helpers shared by the classifier, formatter and keystroke helpers.

/// Folds full-width digits (U+FF10..U+FF19) to their ASCII forms.
/// Every other character is kept as is.
pub fn replace_full_width_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{ff10}'..='\u{ff19}' => char::from(b'0' + (c as u32 - 0xff10) as u8),
            _ => c,
        })
        .collect()
}

/// Keeps ASCII digits only.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_all_digits(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Last four digits of a number, or fewer if the number is shorter.
pub fn last_four(digits: &str) -> String {
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}
