//! PostgreSQL repositories for users and sessions

use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{SessionRepository, UserRepository};
use crate::models::{NewSession, NewUser, Session, User};

const USER_COLUMNS: &str = "id, login, password_hash, first_name, last_name, avatar, email, \
                            registration_time, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, user_id, login_at, logout_at, refresh_token, device, \
                               platform, user_agent, ip_address, session_duration_seconds, \
                               created_at";

/// User repository
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> DatabaseResult<User> {
    let corrupt = |e: sqlx::Error| DatabaseError::Corrupt(format!("users row: {}", e));

    Ok(User {
        id: row.try_get("id").map_err(corrupt)?,
        login: row.try_get("login").map_err(corrupt)?,
        password_hash: row.try_get("password_hash").map_err(corrupt)?,
        first_name: row.try_get("first_name").map_err(corrupt)?,
        last_name: row.try_get("last_name").map_err(corrupt)?,
        avatar: row.try_get("avatar").map_err(corrupt)?,
        email: row.try_get("email").map_err(corrupt)?,
        registration_time: row.try_get("registration_time").map_err(corrupt)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
        updated_at: row.try_get("updated_at").map_err(corrupt)?,
    })
}

impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", input.login);

        let query = format!(
            "INSERT INTO users (id, login, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&input.login)
            .bind(&input.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        user_from_row(&row)
    }

    async fn find_by_login(&self, login: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by login: {}", login);

        let query = format!("SELECT {} FROM users WHERE login = $1", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        debug!("Finding user by ID: {}", id);

        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Session repository over the `user_sessions` table
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn session_from_row(row: &PgRow) -> DatabaseResult<Session> {
    let corrupt = |e: sqlx::Error| DatabaseError::Corrupt(format!("user_sessions row: {}", e));

    Ok(Session {
        id: row.try_get("id").map_err(corrupt)?,
        user_id: row.try_get("user_id").map_err(corrupt)?,
        login_at: row.try_get("login_at").map_err(corrupt)?,
        logout_at: row.try_get("logout_at").map_err(corrupt)?,
        refresh_token: row.try_get("refresh_token").map_err(corrupt)?,
        device: row.try_get("device").map_err(corrupt)?,
        platform: row.try_get("platform").map_err(corrupt)?,
        user_agent: row.try_get("user_agent").map_err(corrupt)?,
        ip_address: row.try_get("ip_address").map_err(corrupt)?,
        session_duration_seconds: row.try_get("session_duration_seconds").map_err(corrupt)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
    })
}

impl SessionRepository for PgSessionRepository {
    async fn open(&self, input: NewSession) -> DatabaseResult<Session> {
        info!("Opening session for user: {}", input.user_id);

        let query = format!(
            r#"
            INSERT INTO user_sessions
                (id, user_id, refresh_token, device, platform, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(input.user_id)
            .bind(&input.refresh_token)
            .bind(&input.metadata.device)
            .bind(&input.metadata.platform)
            .bind(&input.metadata.user_agent)
            .bind(&input.metadata.ip_address)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        session_from_row(&row)
    }

    async fn find_open_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> DatabaseResult<Option<Session>> {
        let query = format!(
            "SELECT {} FROM user_sessions WHERE refresh_token = $1 AND logout_at IS NULL",
            SESSION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(refresh_token)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn rotate_refresh_token(
        &self,
        session_id: Uuid,
        current: &str,
        replacement: &str,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_sessions
            SET refresh_token = $3
            WHERE id = $1 AND refresh_token = $2 AND logout_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(current)
        .bind(replacement)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let rotated = result.rows_affected() == 1;
        if !rotated {
            warn!("Refresh token rotation lost for session: {}", session_id);
        }
        Ok(rotated)
    }

    async fn close(&self, session_id: Uuid, user_id: Uuid) -> DatabaseResult<Option<Session>> {
        info!("Closing session {} for user {}", session_id, user_id);

        let query = format!(
            r#"
            UPDATE user_sessions
            SET logout_at = NOW(),
                session_duration_seconds =
                    GREATEST(0, FLOOR(EXTRACT(EPOCH FROM (NOW() - login_at)))::BIGINT),
                refresh_token = NULL
            WHERE id = $1 AND user_id = $2 AND logout_at IS NULL
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> DatabaseResult<Vec<Session>> {
        let query = format!(
            "SELECT {} FROM user_sessions WHERE user_id = $1 ORDER BY login_at DESC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        rows.iter().map(session_from_row).collect()
    }
}
