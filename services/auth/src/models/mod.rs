//! Authentication service models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::{NewSession, Session, SessionMetadata};
pub use user::{Credentials, NewUser, User};
