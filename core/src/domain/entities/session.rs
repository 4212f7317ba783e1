//! Refresh session entity and the descriptor cached alongside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TokenId, UserId};

/// Device the session was opened from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceMeta {
    pub ip_address: String,
    pub location: String,
    pub device: String,
    pub os: String,
}

impl DeviceMeta {
    pub fn new(
        ip_address: impl Into<String>,
        location: impl Into<String>,
        device: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            ip_address: ip_address.into(),
            location: location.into(),
            device: device.into(),
            os: os.into(),
        }
    }
}

/// Lifecycle state of a session.
///
/// A revoked session has no row left, so only the two states a stored row
/// can be in are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Expired,
}

/// Durable record of one refresh token.
///
/// Created once at login and never updated; a new login creates a new row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Refresh token id, primary key
    pub token_id: TokenId,
    /// Owner of the session
    pub user_id: UserId,
    /// Device metadata captured at login
    pub device: DeviceMeta,
    /// When the session was opened
    pub login_at: DateTime<Utc>,
    /// Signed expiry of the refresh token
    pub expires_at: DateTime<Utc>,
    /// Access token issued together with the refresh token
    pub access_token_id: TokenId,
}

impl RefreshSession {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_expired() {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }
}

/// Revocation cache payload stored under a refresh token id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub user_id: UserId,
    pub access_token_id: TokenId,
    #[serde(default)]
    pub device: DeviceMeta,
}

impl SessionDescriptor {
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

impl From<&RefreshSession> for SessionDescriptor {
    fn from(session: &RefreshSession) -> Self {
        Self {
            user_id: session.user_id,
            access_token_id: session.access_token_id,
            device: session.device.clone(),
        }
    }
}
