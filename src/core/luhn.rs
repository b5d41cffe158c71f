//! Luhn mod-10 checksum.

/// Returns true when `digits` passes the Luhn check.
///
/// Starting from the rightmost digit, every second digit is doubled and
/// reduced by 9 when it exceeds 9; the number is valid when the sum of all
/// digits is a multiple of 10. Callers pass ASCII digits only; any other
/// character makes the check fail.
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0u32;

    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}
