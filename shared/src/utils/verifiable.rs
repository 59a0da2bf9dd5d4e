//! Verifiable identity utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Check whether a verifiable looks like an email address
pub fn is_email(verifiable: &str) -> bool {
    EMAIL_REGEX.is_match(verifiable.trim())
}

/// Mask a verifiable for logging
///
/// Email addresses keep the first character of the local part and the domain
/// (`j***@example.com`); anything else keeps its last four characters.
pub fn mask_verifiable(verifiable: &str) -> String {
    if let Some((local, domain)) = verifiable.split_once('@') {
        return match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        };
    }

    let chars: Vec<char> = verifiable.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{}", tail)
    }
}
