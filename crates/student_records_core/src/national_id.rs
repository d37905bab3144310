//! Ecuadorian national-ID (cédula) check digit validation.
//!
//! # Responsibility
//! - Decide whether a 10-digit identifier carries a correct check digit.
//!
//! # Invariants
//! - Validation is pure and deterministic; malformed input yields `false`
//!   and never panics.
//! - Only natural-person ids are accepted (third digit below 6).

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of characters in a well-formed national id.
pub const NATIONAL_ID_LEN: usize = 10;

const PROVINCE_MIN: u8 = 1;
const PROVINCE_MAX: u8 = 24;
const NATURAL_PERSON_LIMIT: u8 = 6;
const COEFFICIENTS: [u8; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

static NATIONAL_ID_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid national id regex"));
static PREFIX_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9}$").expect("valid id prefix regex"));

/// Returns whether `id` is a structurally valid national id with a correct
/// check digit.
///
/// Rules:
/// - exactly 10 ASCII digits;
/// - province code (first two digits) within `1..=24`;
/// - third digit below 6;
/// - last digit equals [`check_digit`] of the first nine.
pub fn is_valid_national_id(id: &str) -> bool {
    if !NATIONAL_ID_SHAPE.is_match(id) {
        return false;
    }

    let digits = to_digits(id);
    let province = digits[0] * 10 + digits[1];
    if !(PROVINCE_MIN..=PROVINCE_MAX).contains(&province) {
        return false;
    }
    if digits[2] >= NATURAL_PERSON_LIMIT {
        return false;
    }

    match check_digit(&id[..NATIONAL_ID_LEN - 1]) {
        Some(expected) => expected == digits[NATIONAL_ID_LEN - 1],
        None => false,
    }
}

/// Computes the check digit for a 9-digit prefix.
///
/// Each digit is weighted by the alternating `2,1,2,...` sequence; weighted
/// values above 9 are reduced by 9. The check digit is the distance from the
/// sum up to the next multiple of ten (zero when the sum already is one).
///
/// Returns `None` when `first_nine` is not exactly nine ASCII digits.
/// Province and category rules are not applied here.
pub fn check_digit(first_nine: &str) -> Option<u8> {
    if !PREFIX_SHAPE.is_match(first_nine) {
        return None;
    }

    let total: u32 = to_digits(first_nine)
        .iter()
        .zip(COEFFICIENTS)
        .map(|(digit, coefficient)| {
            let weighted = u32::from(digit * coefficient);
            if weighted > 9 {
                weighted - 9
            } else {
                weighted
            }
        })
        .sum();

    let upper_ten = total.div_ceil(10) * 10;
    u8::try_from(upper_ten - total).ok()
}

// Callers guarantee ASCII digits via the shape regexes.
fn to_digits(value: &str) -> Vec<u8> {
    value.bytes().map(|byte| byte - b'0').collect()
}

#[cfg(test)]
mod tests {
    use super::{check_digit, is_valid_national_id};

    #[test]
    fn check_digit_is_zero_when_total_is_a_multiple_of_ten() {
        // 9*2 -> 9, 9*1 -> 9, 2*1 -> 2: total 20.
        assert_eq!(check_digit("990000020"), Some(0));
        assert_eq!(check_digit("171003406"), Some(5));
    }

    #[test]
    fn check_digit_rejects_non_digit_prefix() {
        assert_eq!(check_digit("17100340a"), None);
        assert_eq!(check_digit("17100340"), None);
    }

    #[test]
    fn rejects_non_ascii_digits_without_panicking() {
        assert!(!is_valid_national_id("١٧١٠٠٣٤٠٦٥"));
        assert!(!is_valid_national_id("171003406５"));
    }

    #[test]
    fn rejects_province_zero() {
        assert!(!is_valid_national_id("0010034065"));
    }
}
