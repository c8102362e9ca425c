//! In-process repositories backed by mutex-guarded maps
//!
//! Each conditional operation holds the map lock across its check and its
//! write, which gives the same atomicity the SQL statements get from a
//! single `UPDATE ... WHERE`.

use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{SessionRepository, UserRepository};
use crate::models::{NewSession, NewUser, Session, User};

/// User store keyed by id
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.lock().await;

        if users.values().any(|user| user.login == input.login) {
            return Err(DatabaseError::UniqueViolation(format!(
                "login {} already taken",
                input.login
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            login: input.login,
            password_hash: input.password_hash,
            first_name: None,
            last_name: None,
            avatar: None,
            email: None,
            registration_time: now,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.login == login).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        Ok(self.users.lock().await.remove(&id).is_some())
    }
}

/// Session store keyed by id
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    async fn open(&self, input: NewSession) -> DatabaseResult<Session> {
        let mut sessions = self.sessions.lock().await;

        let token_in_use = sessions
            .values()
            .any(|s| s.is_open() && s.refresh_token.as_deref() == Some(input.refresh_token.as_str()));
        if token_in_use {
            return Err(DatabaseError::UniqueViolation(
                "refresh token already bound to an open session".to_string(),
            ));
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            login_at: now,
            logout_at: None,
            refresh_token: Some(input.refresh_token),
            device: input.metadata.device,
            platform: input.metadata.platform,
            user_agent: input.metadata.user_agent,
            ip_address: input.metadata.ip_address,
            session_duration_seconds: None,
            created_at: now,
        };
        sessions.insert(session.id, session.clone());

        Ok(session)
    }

    async fn find_open_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> DatabaseResult<Option<Session>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .find(|s| s.is_open() && s.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn rotate_refresh_token(
        &self,
        session_id: Uuid,
        current: &str,
        replacement: &str,
    ) -> DatabaseResult<bool> {
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(&session_id) {
            Some(session) if session.is_open() && session.refresh_token.as_deref() == Some(current) => {
                session.refresh_token = Some(replacement.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn close(&self, session_id: Uuid, user_id: Uuid) -> DatabaseResult<Option<Session>> {
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(&session_id) {
            Some(session) if session.is_open() && session.user_id == user_id => {
                let now = Utc::now();
                session.logout_at = Some(now);
                session.session_duration_seconds =
                    Some((now - session.login_at).num_seconds().max(0));
                session.refresh_token = None;
                Ok(Some(session.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<Session>> {
        let sessions = self.sessions.lock().await;
        let mut owned: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.login_at.cmp(&a.login_at));
        Ok(owned)
    }
}
