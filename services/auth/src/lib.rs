//! Authentication core for the work tracking backend
//!
//! Registers users, authenticates them and manages per-device sessions with
//! rotating refresh tokens. Transport is left to the caller: it resolves the
//! user with [`AuthService::authenticate`] and maps [`AuthError`] onto its own
//! status codes.
//!
//! ```rust,no_run
//! use auth::{AuthConfig, AuthService, InMemorySessionRepository, InMemoryUserRepository};
//! use auth::models::{Credentials, SessionMetadata};
//!
//! # async fn demo() -> Result<(), auth::AuthError> {
//! let service = AuthService::new(
//!     InMemoryUserRepository::new(),
//!     InMemorySessionRepository::new(),
//!     AuthConfig::with_secret("change-me"),
//! )?;
//!
//! let credentials = Credentials { login: "alice".into(), password: "hunter22".into() };
//! let tokens = service.register(credentials, SessionMetadata::default()).await?;
//! let user_id = service.authenticate(&tokens.access_token)?;
//! service.logout(user_id, tokens.session_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod jwt;
pub mod metadata;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod session;
pub mod validation;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use repositories::{
    InMemorySessionRepository, InMemoryUserRepository, PgSessionRepository, PgUserRepository,
};
pub use service::{AuthOutput, AuthService};
