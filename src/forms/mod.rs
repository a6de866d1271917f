//! Form payloads and their conversion into domain values.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod deliveries;
pub mod employees;
pub mod inventory;
pub mod licenses;
pub mod payroll;
pub mod permissions;
pub mod sales;
pub mod sms;
pub mod stations;
pub mod users;

/// Maximum allowed length for names and other single-line labels.
pub(crate) const NAME_MAX_LEN: u64 = 128;

/// Problems with a money amount typed into a form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("`{0}` is not a valid amount")]
    Invalid(String),
    #[error("amount `{0}` cannot be negative")]
    Negative(String),
    #[error("amount `{0}` is too large")]
    TooLarge(String),
}

/// Parse a dollar amount such as `1,234.56` or `$12.5` into cents.
pub fn parse_money_cents(input: &str) -> Result<i32, MoneyError> {
    let trimmed = input.trim();
    let compact: String = trimmed
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();

    if compact.is_empty() {
        return Ok(0);
    }

    let (negative, digits) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.as_str()),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    let well_formed = !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|ch| ch.is_ascii_digit())
        && fraction.chars().all(|ch| ch.is_ascii_digit())
        && fraction.len() <= 2;
    if !well_formed {
        return Err(MoneyError::Invalid(trimmed.to_string()));
    }
    if negative {
        return Err(MoneyError::Negative(trimmed.to_string()));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| MoneyError::TooLarge(trimmed.to_string()))?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
        _ => fraction
            .parse()
            .map_err(|_| MoneyError::Invalid(trimmed.to_string()))?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .and_then(|cents| i32::try_from(cents).ok())
        .ok_or_else(|| MoneyError::TooLarge(trimmed.to_string()))
}

/// Render cents as a plain decimal amount, e.g. `1234.50`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Deserialize an optional form value, treating blank input as `None`.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize a numeric reading, treating blank input as zero.
pub(crate) fn blank_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.unwrap_or(0.0))
}

/// Collapse whitespace runs and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize every line and squeeze repeated blank lines.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut previous_empty = true;

    for line in input.lines().map(sanitize_inline_text) {
        if line.is_empty() {
            if !previous_empty {
                result.push(String::new());
            }
            previous_empty = true;
        } else {
            result.push(line);
            previous_empty = false;
        }
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}

/// Sanitized single-line text, `None` when nothing is left.
pub(crate) fn optional_inline(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

/// Sanitized multi-line text, `None` when nothing is left.
pub(crate) fn optional_multiline(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_amounts_are_parsed_into_cents() {
        assert_eq!(parse_money_cents("12.34"), Ok(1234));
        assert_eq!(parse_money_cents("$1,234.5"), Ok(123_450));
        assert_eq!(parse_money_cents(" 7 "), Ok(700));
        assert_eq!(parse_money_cents(".99"), Ok(99));
        assert_eq!(parse_money_cents(""), Ok(0));
    }

    #[test]
    fn malformed_money_is_rejected() {
        assert_eq!(
            parse_money_cents("12.345"),
            Err(MoneyError::Invalid("12.345".to_string()))
        );
        assert_eq!(
            parse_money_cents("abc"),
            Err(MoneyError::Invalid("abc".to_string()))
        );
        assert_eq!(
            parse_money_cents("-5"),
            Err(MoneyError::Negative("-5".to_string()))
        );
        assert!(matches!(
            parse_money_cents("99999999999"),
            Err(MoneyError::TooLarge(_))
        ));
    }

    #[test]
    fn cents_are_formatted_with_two_decimals() {
        assert_eq!(format_cents(123_405), "1234.05");
        assert_eq!(format_cents(-250), "-2.50");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn multiline_text_is_squeezed() {
        assert_eq!(
            sanitize_multiline_text("\n first  line \n\n\n second\n\n"),
            "first line\n\nsecond"
        );
    }
}
