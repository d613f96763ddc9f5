//! Login validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur while validating new login details
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoginValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username '{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password cannot be empty")]
    EmptyPassword,
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

/// Check that a string has the standard email shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate the details supplied for a new login
///
/// Rules:
/// - Username is required and must be email-shaped
/// - Password is required
pub fn validate_new_login(username: &str, password: &str) -> Result<(), LoginValidationError> {
    if username.is_empty() {
        return Err(LoginValidationError::EmptyUsername);
    }

    if !is_valid_email(username) {
        return Err(LoginValidationError::InvalidEmail(username.to_string()));
    }

    if password.is_empty() {
        return Err(LoginValidationError::EmptyPassword);
    }

    Ok(())
}
