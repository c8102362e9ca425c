//! Session ledger: the record of login-to-logout intervals per device

use tracing::instrument;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::{NewSession, Session, SessionMetadata};
use crate::repositories::SessionRepository;

/// Session ledger over a [`SessionRepository`]
///
/// Misses on lookup, rotation and close all surface as
/// [`AuthError::SessionNotFound`], so a closed session, a foreign session and
/// a nonexistent one are indistinguishable to the caller.
#[derive(Debug, Clone)]
pub struct SessionLedger<S> {
    repo: S,
}

impl<S: SessionRepository> SessionLedger<S> {
    /// Create a new ledger
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Open a session for a user, bound to `refresh_token`
    #[instrument(level = "debug", skip(self, refresh_token, metadata))]
    pub async fn open(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        metadata: SessionMetadata,
    ) -> AuthResult<Session> {
        let session = self
            .repo
            .open(NewSession {
                user_id,
                refresh_token: refresh_token.to_string(),
                metadata,
            })
            .await?;

        Ok(session)
    }

    /// The open session holding `refresh_token`
    #[instrument(level = "debug", skip_all)]
    pub async fn find_open_by_refresh_token(&self, refresh_token: &str) -> AuthResult<Session> {
        self.repo
            .find_open_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Replace the session's token, provided it still holds `current`
    #[instrument(level = "debug", skip(self, current, replacement))]
    pub async fn rotate(&self, session_id: Uuid, current: &str, replacement: &str) -> AuthResult<()> {
        if self
            .repo
            .rotate_refresh_token(session_id, current, replacement)
            .await?
        {
            Ok(())
        } else {
            Err(AuthError::SessionNotFound)
        }
    }

    /// Close an open session owned by `user_id`
    #[instrument(level = "debug", skip(self))]
    pub async fn close(&self, session_id: Uuid, user_id: Uuid) -> AuthResult<Session> {
        self.repo
            .close(session_id, user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)
    }

    /// Every session of a user, newest first
    #[instrument(level = "debug", skip(self))]
    pub async fn list(&self, user_id: Uuid) -> AuthResult<Vec<Session>> {
        Ok(self.repo.list_by_user(user_id).await?)
    }
}
