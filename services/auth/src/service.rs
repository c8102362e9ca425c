//! Authentication service: register, login, refresh and logout orchestration
//!
//! Every operation takes the caller's identity explicitly and returns a
//! classified [`AuthError`]. Nothing here retries; storage adapters own that.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwt::{JwtService, TokenType};
use crate::models::{Credentials, NewUser, Session, SessionMetadata, User};
use crate::password::CredentialHasher;
use crate::repositories::{SessionRepository, UserRepository};
use crate::session::SessionLedger;
use crate::validation::{validate_login, validate_password};

/// Token pair handed back after register, login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutput {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    pub user: User,
    pub session_id: Uuid,
}

/// Composes the hasher, token issuer and session ledger
#[derive(Debug, Clone)]
pub struct AuthService<U, S> {
    users: U,
    sessions: SessionLedger<S>,
    hasher: CredentialHasher,
    jwt: JwtService,
    min_password_length: usize,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    /// Build the service; fails when the secret or hash cost is unusable.
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> AuthResult<Self> {
        Ok(Self {
            users: user_repo,
            sessions: SessionLedger::new(session_repo),
            hasher: CredentialHasher::new(config.hash_cost)?,
            jwt: JwtService::new(&config)?,
            min_password_length: config.min_password_length,
        })
    }

    /// Create an account and open its first session
    #[instrument(level = "debug", skip(self, credentials, metadata), fields(login = %credentials.login))]
    pub async fn register(
        &self,
        credentials: Credentials,
        metadata: SessionMetadata,
    ) -> AuthResult<AuthOutput> {
        validate_login(&credentials.login)?;
        validate_password(&credentials.password, self.min_password_length)?;

        let password_hash = self.hasher.hash(&credentials.password)?;

        let user = self
            .users
            .create(NewUser {
                login: credentials.login,
                password_hash,
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AuthError::AlreadyExists
                } else {
                    e.into()
                }
            })?;

        let user_id = user.id;
        let reason = match self.start_session(user, metadata).await {
            Ok(output) => return Ok(output),
            Err(AuthError::InternalFailure(reason)) => reason,
            Err(other) => other.to_string(),
        };

        // Without a session the account must not stay behind.
        match self.users.delete(user_id).await {
            Ok(_) => Err(AuthError::InternalFailure(reason)),
            Err(e) => Err(AuthError::InternalFailure(format!(
                "{reason}; user {user_id} could not be removed: {e}"
            ))),
        }
    }

    /// Check credentials and open a new session
    #[instrument(level = "debug", skip(self, credentials, metadata), fields(login = %credentials.login))]
    pub async fn login(
        &self,
        credentials: Credentials,
        metadata: SessionMetadata,
    ) -> AuthResult<AuthOutput> {
        if credentials.login.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::ValidationFailure(
                "login and password are required".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_login(&credentials.login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = self
            .hasher
            .verify(&user.password_hash, &credentials.password)
            .map_err(|e| match e {
                AuthError::MalformedDigest(reason) => AuthError::InternalFailure(format!(
                    "stored digest of user {} is unusable: {reason}",
                    user.id
                )),
                other => other,
            })?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(user, metadata).await
    }

    /// Exchange a refresh token for a new pair, consuming the old one
    #[instrument(level = "debug", skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<AuthOutput> {
        let claims = self
            .jwt
            .validate_token(refresh_token)
            .map_err(|_| AuthError::Unauthorized)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::Unauthorized);
        }

        let session = self
            .sessions
            .find_open_by_refresh_token(refresh_token)
            .await?;

        if session.user_id != claims.sub {
            return Err(AuthError::Unauthorized);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| {
                AuthError::InternalFailure(format!("session {} has no user", session.id))
            })?;

        let access_token = self.jwt.generate_access_token(user.id)?;
        let new_refresh_token = self.jwt.generate_refresh_token(user.id)?;

        self.sessions
            .rotate(session.id, refresh_token, &new_refresh_token)
            .await?;

        Ok(self.output(access_token, new_refresh_token, user, session.id))
    }

    /// Close one of the caller's sessions
    #[instrument(level = "debug", skip(self))]
    pub async fn logout(&self, user_id: Uuid, session_id: Uuid) -> AuthResult<()> {
        if session_id.is_nil() {
            return Err(AuthError::ValidationFailure(
                "session id is required".to_string(),
            ));
        }

        self.sessions.close(session_id, user_id).await?;
        Ok(())
    }

    /// Resolve the caller behind an access token
    #[instrument(level = "debug", skip_all)]
    pub fn authenticate(&self, access_token: &str) -> AuthResult<Uuid> {
        let claims = self.jwt.validate_token(access_token)?;

        if claims.token_type != TokenType::Access {
            return Err(AuthError::Unauthorized);
        }

        Ok(claims.sub)
    }

    /// Session history of the caller
    pub async fn sessions(&self, user_id: Uuid) -> AuthResult<Vec<Session>> {
        self.sessions.list(user_id).await
    }

    async fn start_session(&self, user: User, metadata: SessionMetadata) -> AuthResult<AuthOutput> {
        let access_token = self.jwt.generate_access_token(user.id)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id)?;

        let session = self
            .sessions
            .open(user.id, &refresh_token, metadata)
            .await?;

        Ok(self.output(access_token, refresh_token, user, session.id))
    }

    fn output(
        &self,
        access_token: String,
        refresh_token: String,
        user: User,
        session_id: Uuid,
    ) -> AuthOutput {
        AuthOutput {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry(),
            user,
            session_id,
        }
    }
}
