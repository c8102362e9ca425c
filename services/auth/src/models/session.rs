//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One login-to-logout interval
///
/// A session with `logout_at` set is closed and never changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub login_at: DateTime<Utc>,
    pub logout_at: Option<DateTime<Utc>>,
    /// Refresh token currently bound to the session; cleared at close
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    pub device: Option<String>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub session_duration_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.logout_at.is_none()
    }
}

/// New session creation payload
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub refresh_token: String,
    pub metadata: SessionMetadata,
}

/// Device details captured at login for audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub device: Option<String>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
