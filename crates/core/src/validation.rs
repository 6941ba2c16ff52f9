//! Input validation helpers for account and form fields.
//!
//! These run client-side before any network call; the backend remains
//! the authority and revalidates everything.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,30}$").expect("valid regex"));

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Loose email shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Usernames are 3 to 30 word characters.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username.trim())
}

/// Passwords need at least [`MIN_PASSWORD_LENGTH`] characters including
/// one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Entity ids are UUIDs or positive integers, depending on the backend.
pub fn is_valid_id(id: &str) -> bool {
    if uuid::Uuid::parse_str(id).is_ok() {
        return true;
    }
    matches!(id.parse::<i64>(), Ok(n) if n > 0)
}

/// Truncate a string to `max_length` characters, appending an ellipsis
/// when anything was cut.
pub fn truncate(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Email ---------------------------------------------------------------

    #[test]
    fn plausible_emails_accepted() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email(" padded@example.org "));
    }

    #[test]
    fn malformed_emails_rejected() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    // -- Username ------------------------------------------------------------

    #[test]
    fn username_length_bounds() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username(&"a".repeat(30)));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"a".repeat(31)));
    }

    #[test]
    fn username_character_set() {
        assert!(is_valid_username("user_42"));
        assert!(!is_valid_username("user name"));
        assert!(!is_valid_username("user-name"));
    }

    // -- Password ------------------------------------------------------------

    #[test]
    fn password_needs_letter_and_digit() {
        assert!(is_valid_password("secret42"));
        assert!(!is_valid_password("allletters"));
        assert!(!is_valid_password("12345678"));
        assert!(!is_valid_password("ab1"));
    }

    // -- Entity ids ----------------------------------------------------------

    #[test]
    fn uuid_and_numeric_ids_accepted() {
        assert!(is_valid_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_id("42"));
    }

    #[test]
    fn bogus_ids_rejected() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("0"));
        assert!(!is_valid_id("-5"));
        assert!(!is_valid_id("not-a-uuid"));
    }

    // -- Truncation ----------------------------------------------------------

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
