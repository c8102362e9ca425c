//! Storage abstractions for users and sessions
//!
//! Every operation is async and returns [`DatabaseResult`]. Lookups that may
//! legitimately miss return `Option`; the services decide which error a miss
//! becomes. Conditional writes report whether they matched, so callers can
//! turn a lost race into a classified failure instead of a silent overwrite.

use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewSession, NewUser, Session, User};

pub mod memory;
pub mod postgres;

pub use memory::{InMemorySessionRepository, InMemoryUserRepository};
pub use postgres::{PgSessionRepository, PgUserRepository};

pub trait UserRepository: Send + Sync {
    /// Insert a user. A taken login yields `DatabaseError::UniqueViolation`.
    fn create(&self, input: NewUser) -> impl Future<Output = DatabaseResult<User>> + Send;
    fn find_by_login(
        &self,
        login: &str,
    ) -> impl Future<Output = DatabaseResult<Option<User>>> + Send;
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = DatabaseResult<Option<User>>> + Send;

    /// Remove a user and, through the schema, its sessions. Returns whether a
    /// row was removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = DatabaseResult<bool>> + Send;
}

pub trait SessionRepository: Send + Sync {
    /// Record a new open session bound to the given refresh token.
    fn open(&self, input: NewSession) -> impl Future<Output = DatabaseResult<Session>> + Send;

    /// The open session currently bound to `refresh_token`, if any.
    fn find_open_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = DatabaseResult<Option<Session>>> + Send;

    /// Swap the bound token, only if the session is still open and still
    /// holds `current`. Returns whether the swap happened.
    fn rotate_refresh_token(
        &self,
        session_id: Uuid,
        current: &str,
        replacement: &str,
    ) -> impl Future<Output = DatabaseResult<bool>> + Send;

    /// Close an open session owned by `user_id`: stamp logout, compute the
    /// duration and clear the token. `None` when nothing matched.
    fn close(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Session>>> + Send;

    /// All sessions of a user, newest login first.
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<Session>>> + Send;
}
