//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// API key service names: lowercase identifiers such as `gemini`
static SERVICE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap());

/// Validate an API key service name
pub fn validate_service_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 64 && SERVICE_NAME_REGEX.is_match(name)
}

/// Validate an API key secret: non-empty, no whitespace
pub fn validate_api_secret(secret: &str) -> bool {
    !secret.is_empty() && secret.len() <= 512 && !secret.chars().any(char::is_whitespace)
}

/// Normalize an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check a password against the configured minimum length
pub fn validate_password(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {} characters long",
            min_length
        ));
    }
    Ok(())
}
