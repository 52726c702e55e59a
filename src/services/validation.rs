//! Input validation helpers
//!
//! Shared validators for the request layer: email and phone formats plus
//! GPS coordinate strings captured by the mobile clients as "lat, lng".

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,17}$").unwrap());

/// Check that a string looks like an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check that a string looks like a phone number (digits, spaces, dashes,
/// optional leading +)
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Parse a "lat, lng" coordinate pair, validating the ranges.
pub fn parse_gps(location: &str) -> Option<(f64, f64)> {
    let mut parts = location.splitn(2, ',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lng: f64 = parts.next()?.trim().parse().ok()?;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Some((lat, lng))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("head.teacher+fuel@school.ac.ug"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("+256700123456"));
        assert!(is_valid_phone("0700 123 456"));
        assert!(is_valid_phone("0700-123-456"));
        assert!(!is_valid_phone("abc123"));
        assert!(!is_valid_phone("12345"));
    }

    #[test]
    fn test_parse_gps() {
        assert_eq!(parse_gps("0.3476, 32.5825"), Some((0.3476, 32.5825)));
        assert_eq!(parse_gps("-1.95,30.06"), Some((-1.95, 30.06)));
        assert!(parse_gps("91.0, 0.0").is_none());
        assert!(parse_gps("0.0, 181.0").is_none());
        assert!(parse_gps("not coordinates").is_none());
        assert!(parse_gps("0.5").is_none());
    }
}
