//! Validation predicates run after a leaf filter has sanitized its input

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use validator::{ValidateEmail, ValidateUrl};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn numeric_regex() -> &'static Regex {
    static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMERIC_REGEX.get_or_init(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").unwrap())
}

/// Text is a plain decimal number: optional sign, digits, optional fraction
pub fn is_numeric(text: &str) -> bool {
    numeric_regex().is_match(text)
}

/// Leading numeric part of `text`, used when validation is switched off
pub fn numeric_prefix(text: &str) -> Option<&str> {
    static PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PREFIX_REGEX
        .get_or_init(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").unwrap());
    regex.find(text).map(|m| m.as_str())
}

pub fn is_url(text: &str) -> bool {
    text.to_string().validate_url()
}

pub fn is_email(text: &str) -> bool {
    text.to_string().validate_email()
}

/// Exactly four digits
pub fn is_year(text: &str) -> bool {
    text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit())
}

/// An all-digit Unix timestamp that survives a format/parse round trip
pub fn is_timestamp(text: &str) -> bool {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(seconds) = text.parse::<i64>() else {
        return false;
    };
    let Some(instant) = DateTime::from_timestamp(seconds, 0) else {
        return false;
    };
    let formatted = instant.format(TIMESTAMP_FORMAT).to_string();
    NaiveDateTime::parse_from_str(&formatted, TIMESTAMP_FORMAT)
        .map(|parsed| parsed.and_utc().timestamp() == seconds)
        .unwrap_or(false)
}

/// `YYYY-MM-DD`, with `-`, `.`, `/` or `\` as separator
pub fn is_date(text: &str) -> bool {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]{4}[\\/.\-][0-9]{1,2}[\\/.\-][0-9]{1,2}$").unwrap());
    regex.is_match(text)
}

/// `YYYY-MM-DD HH:MM:SS`, with `-`, `.` or `:` between the time parts
pub fn is_datetime(text: &str) -> bool {
    static DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATETIME_REGEX.get_or_init(|| {
        Regex::new(
            r"^[0-9]{4}[\\/.\-][0-9]{1,2}[\\/.\-][0-9]{1,2}\s[0-9]{1,2}[.\-:][0-9]{1,2}[.\-:][0-9]{1,2}$",
        )
        .unwrap()
    });
    regex.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === is_numeric() ===

    #[test]
    fn test_is_numeric_accepts_plain_numbers() {
        for text in ["0", "12", "-12", "+3", "12.5", "5.", ".5", "-0.25"] {
            assert!(is_numeric(text), "{text} should be numeric");
        }
    }

    #[test]
    fn test_is_numeric_rejects_garbage() {
        for text in ["", "-", ".", "1.2.3", "3423.4-200.01", "1-2", "+-1"] {
            assert!(!is_numeric(text), "{text} should not be numeric");
        }
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("3423.4-200.01"), Some("3423.4"));
        assert_eq!(numeric_prefix("-12abc"), Some("-12"));
        assert_eq!(numeric_prefix("--1"), None);
    }

    // === url / email ===

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(!is_url("notaurl"));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("thomas@example.net"));
        assert!(!is_email("thomas.example.net"));
    }

    // === temporal ===

    #[test]
    fn test_is_year() {
        assert!(is_year("2024"));
        assert!(!is_year("202"));
        assert!(!is_year("-2024"));
    }

    #[test]
    fn test_is_timestamp() {
        assert!(is_timestamp("0"));
        assert!(is_timestamp("1700000000"));
        assert!(!is_timestamp("-1"));
        assert!(!is_timestamp("17e9"));
        assert!(!is_timestamp("99999999999999999999"));
    }

    #[test]
    fn test_is_date_separators() {
        assert!(is_date("2024-01-15"));
        assert!(is_date("2024/1/5"));
        assert!(is_date("2024.01.15"));
        assert!(is_date(r"2024\01\15"));
        assert!(!is_date("24-01-15"));
        assert!(!is_date("2024-01-15 10:00:00"));
    }

    #[test]
    fn test_is_datetime() {
        assert!(is_datetime("2024-01-15 10:30:00"));
        assert!(is_datetime("2024/1/5 7.5.9"));
        assert!(!is_datetime("2024-01-15"));
        assert!(!is_datetime("2024-01-15T10:30:00"));
    }
}
