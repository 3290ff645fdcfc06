use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CredentialProvider;

/// Token expiry time in minutes.
/// Courtside admin tokens expire after ~30 minutes of inactivity.
const TOKEN_EXPIRY_MINUTES: i64 = 30;

/// Buffer time before expiry to trigger refresh (5 minutes)
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: impl Into<String>, user_id: i64, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id,
            username: username.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES);
        Utc::now() > expiry
    }

    /// Check if the session will expire soon and should be refreshed
    pub fn needs_refresh(&self) -> bool {
        let refresh_at = self.created_at
            + Duration::minutes(TOKEN_EXPIRY_MINUTES - TOKEN_REFRESH_BUFFER_MINUTES);
        Utc::now() > refresh_at
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        let expiry = self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES);
        (expiry - Utc::now()).num_minutes().max(0)
    }
}

/// In-memory session state. Durable storage is a collaborator outside this
/// crate; the data layer only needs the current token and a way to drop it.
#[derive(Debug, Default)]
pub struct Session {
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Clear session data
    pub fn clear(&mut self) {
        self.data = None;
    }

    /// Get the bearer token if session is valid
    pub fn token(&self) -> Option<&str> {
        match self.data {
            Some(ref d) if !d.is_expired() => Some(d.token.as_str()),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.data.as_ref().map(|d| d.user_id)
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }
}

/// Shared handle over a `Session`, usable as the transport's credential
/// provider. Clone is cheap.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, data: SessionData) {
        self.lock().update(data);
    }

    pub fn is_valid(&self) -> bool {
        self.lock().is_valid()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.lock().user_id()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        // Session state is plain data; a poisoned lock only means a panic
        // elsewhere already took the process down a bad path.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialProvider for SharedSession {
    fn token(&self) -> Option<String> {
        self.lock().token().map(str::to_string)
    }

    fn clear_session(&self) {
        debug!("clearing session after auth failure");
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_valid() {
        let mut session = Session::new();
        session.update(SessionData::new("tok-1", 42, "admin"));
        assert!(session.is_valid());
        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(session.user_id(), Some(42));
    }

    #[test]
    fn test_expired_session_yields_no_token() {
        let mut data = SessionData::new("tok-1", 42, "admin");
        data.created_at = Utc::now() - Duration::minutes(TOKEN_EXPIRY_MINUTES + 1);
        let mut session = Session::new();
        session.update(data);
        assert!(!session.is_valid());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_needs_refresh_inside_buffer() {
        let mut data = SessionData::new("tok-1", 42, "admin");
        data.created_at = Utc::now() - Duration::minutes(TOKEN_EXPIRY_MINUTES - 2);
        assert!(data.needs_refresh());
        assert!(!data.is_expired());
    }

    #[test]
    fn test_shared_session_clears_on_auth_failure() {
        let shared = SharedSession::new();
        shared.update(SessionData::new("tok-1", 7, "admin"));
        assert_eq!(CredentialProvider::token(&shared), Some("tok-1".to_string()));

        shared.clear_session();
        assert_eq!(CredentialProvider::token(&shared), None);
        assert!(!shared.is_valid());
    }
}
