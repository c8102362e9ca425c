//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AuthError, AuthResult};

/// Maximum login length in characters
pub const MAX_LOGIN_LENGTH: usize = 64;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a login
pub fn validate_login(login: &str) -> AuthResult<()> {
    if login.trim().is_empty() {
        return Err(invalid("Login is required"));
    }

    if login.chars().count() > MAX_LOGIN_LENGTH {
        return Err(invalid(format!(
            "Login must be at most {MAX_LOGIN_LENGTH} characters long"
        )));
    }

    static LOGIN_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = LOGIN_REGEX
        .get_or_init(|| Regex::new(r"^[^\s\p{Cc}]+$").expect("Failed to compile login regex"));

    if !regex.is_match(login) {
        return Err(invalid(
            "Login must not contain whitespace or control characters",
        ));
    }

    Ok(())
}

/// Validate a password against the configured minimum length
pub fn validate_password(password: &str, min_length: usize) -> AuthResult<()> {
    if password.is_empty() {
        return Err(invalid("Password is required"));
    }

    let length = password.chars().count();

    if length < min_length {
        return Err(invalid(format!(
            "Password must be at least {min_length} characters long"
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(invalid(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> AuthError {
    AuthError::ValidationFailure(message.into())
}
