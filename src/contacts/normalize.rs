//! Phone number and email normalization.
//!
//! Contact sources store phone numbers in whatever form the user typed them
//! ("(212) 345-6789", "+1 212-345-6789", ...) while Messages handles use
//! E.164. Everything is funneled through these functions before comparison.
//!
//! CHANGELOG:
//! - 10/18/2026 - Phone matching compares whole national numbers, no suffixes
//! - 10/18/2026 - National-number keys for country-code-agnostic matching
//! - 10/18/2026 - Replaced digit-only normalize_phone with E.164 normalization

use crate::error::{IcaError, Result};

/// Characters allowed in a string that should be treated as a phone number.
const PHONE_PUNCTUATION: &[char] = &[' ', '-', '(', ')', '.', '+', '\u{a0}'];

/// Normalize a phone number to E.164 (e.g. `+12123456789`).
///
/// Ten-digit numbers are assumed to be North American and get a `+1`
/// prefix; numbers written with a leading `+` keep their country code.
pub fn normalize_phone_number(phone: &str) -> Result<String> {
    let trimmed = phone.trim();
    let digits = digits_of(trimmed);

    if digits.len() < 10 {
        return Err(IcaError::InvalidPhoneNumber(phone.to_string()));
    }

    if trimmed.starts_with('+') || digits.len() > 10 {
        return Ok(format!("+{}", digits));
    }

    Ok(format!("+1{}", digits))
}

/// Trim surrounding whitespace from an email address.
pub fn normalize_email_address(email: &str) -> String {
    email.trim().to_string()
}

/// Normalize a handle/identifier for comparison.
///
/// Phone numbers become E.164; anything else is trimmed and lowercased so
/// email comparison is case-insensitive.
pub fn normalize_identifier(identifier: &str) -> String {
    if looks_like_phone_number(identifier) {
        if let Ok(phone) = normalize_phone_number(identifier) {
            return phone;
        }
    }
    identifier.trim().to_lowercase()
}

/// Whether the input consists only of digits and phone punctuation, with a
/// plausible digit count (10-15).
pub fn looks_like_phone_number(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || PHONE_PUNCTUATION.contains(&c));
    let digit_count = trimmed.chars().filter(char::is_ascii_digit).count();
    valid_chars && (10..=15).contains(&digit_count)
}

/// Parse user input as a phone number and return its national-number key.
///
/// Returns `None` when the input is not a valid phone number, in which case
/// it should be matched as a name or email instead.
pub fn parse_phone_identifier(input: &str) -> Option<String> {
    if !looks_like_phone_number(input) {
        return None;
    }
    normalize_phone_number(input)
        .ok()
        .map(|e164| national_number(&e164))
}

/// Strip the country code from an E.164 number.
///
/// Only the North American `+1` prefix is stripped; other numbers keep all
/// digits.
pub fn national_number(e164: &str) -> String {
    let digits = digits_of(e164);
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Whether a stored phone number (any format) refers to the given national
/// number, with or without a country code.
pub fn phone_matches_national(stored: &str, national: &str) -> bool {
    if national.is_empty() {
        return false;
    }
    national_number(stored) == national
}

fn digits_of(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
