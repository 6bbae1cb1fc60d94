//! Syntactic checks for composer input
//!
//! Both predicates treat the empty string as valid: a field that has not been
//! filled in yet is not an error.

use regex::Regex;
use std::sync::LazyLock;

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL including http:// or https://";
pub const INVALID_TOKEN_MESSAGE: &str = "Special characters and spaces are not allowed.";

// Scheme, dotted host ending in a 2-6 letter label, optional path. No query string.
static WEBSITE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)([0-9a-z.-]+)\.([a-z.]{2,6})([/A-Za-z0-9_ .-]*)*/?$")
        .expect("website URL pattern compiles")
});

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").expect("token pattern compiles"));

/// Absolute http(s) address, or empty
pub fn is_valid_website_url(value: &str) -> bool {
    value.is_empty() || WEBSITE_URL_RE.is_match(value)
}

/// Letters, digits, underscore and hyphen only, or empty
pub fn is_valid_token(value: &str) -> bool {
    TOKEN_RE.is_match(value)
}
