//! Session and auth-provider wire types

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The identity record held by the auth provider (distinct from the
/// portal's profile document)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// An authenticated session as returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Check whether the session's access token has expired.
    /// Sessions without an expiry timestamp are treated as live.
    pub fn is_expired(&self) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs() as i64;

        now >= expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "tok".into(),
            refresh_token: "ref".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at,
            user: AuthUser {
                id: "u1".into(),
                email: None,
                phone: None,
                role: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn session_without_expiry_is_live() {
        assert!(!session(None).is_expired());
    }

    #[test]
    fn session_with_past_expiry_is_expired() {
        assert!(session(Some(1)).is_expired());
        assert!(!session(Some(i64::MAX)).is_expired());
    }
}
