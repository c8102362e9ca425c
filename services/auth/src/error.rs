//! Authentication error types

use common::error::DatabaseError;
use thiserror::Error;

/// Classified failures of the authentication core
///
/// Callers map these onto their own status scheme; the core never retries
/// and never decides user-visible wording.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed caller input
    #[error("validation failed: {0}")]
    ValidationFailure(String),

    /// The login is already taken
    #[error("login already exists")]
    AlreadyExists,

    /// Unknown login or wrong password; the two are not distinguished
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    /// No open session matches, or the session is not the caller's
    #[error("session not found")]
    SessionNotFound,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    #[error("malformed password digest: {0}")]
    MalformedDigest(String),

    /// Storage or signing failure not attributable to caller input
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        AuthError::InternalFailure(err.to_string())
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_internal_failures() {
        let err: AuthError = DatabaseError::Configuration("no url".into()).into();
        assert!(matches!(err, AuthError::InternalFailure(msg) if msg.contains("no url")));
    }
}
