//! MySQL implementation of the SessionRepository trait.
//!
//! Rows live in the `sessions` table keyed by refresh token id. Ids are
//! stored as their canonical hyphenated text, so ordering by `token_id`
//! follows issuance order for UUID v7 ids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlDatabaseError, MySqlRow};
use sqlx::{MySqlPool, Row};
use tracing::{debug, error};

use sk_core::domain::entities::{DeviceMeta, RefreshSession, TokenId, UserId};
use sk_core::errors::DomainError;
use sk_core::repositories::SessionRepository;

/// MySQL error number for a duplicate key (ER_DUP_ENTRY)
const ER_DUP_ENTRY: u16 = 1062;

const SELECT_COLUMNS: &str = r#"
    SELECT token_id, user_id, access_token_id, ip_address, location, device, os, login_at, expires_at
    FROM sessions
"#;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshSession entity
    fn row_to_session(row: &MySqlRow) -> Result<RefreshSession, DomainError> {
        let column = |name: &str| -> Result<String, DomainError> {
            row.try_get::<String, _>(name)
                .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", name, e)))
        };
        let timestamp = |name: &str| -> Result<DateTime<Utc>, DomainError> {
            row.try_get::<DateTime<Utc>, _>(name)
                .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", name, e)))
        };

        Ok(RefreshSession {
            token_id: parse_id(&column("token_id")?, "token_id")?,
            user_id: column("user_id")?
                .parse::<UserId>()
                .map_err(|e| DomainError::internal(format!("Invalid user_id: {}", e)))?,
            access_token_id: parse_id(&column("access_token_id")?, "access_token_id")?,
            device: DeviceMeta {
                ip_address: column("ip_address")?,
                location: column("location")?,
                device: column("device")?,
                os: column("os")?,
            },
            login_at: timestamp("login_at")?,
            expires_at: timestamp("expires_at")?,
        })
    }

    fn rows_to_sessions(rows: &[MySqlRow]) -> Result<Vec<RefreshSession>, DomainError> {
        rows.iter().map(Self::row_to_session).collect()
    }
}

fn parse_id(value: &str, column: &str) -> Result<TokenId, DomainError> {
    value
        .parse::<TokenId>()
        .map_err(|e| DomainError::internal(format!("Invalid {}: {}", column, e)))
}

fn query_error(action: &str, e: sqlx::Error) -> DomainError {
    error!("Failed to {}: {}", action, e);
    DomainError::internal(format!("Failed to {}: {}", action, e))
}

/// Whether a SQLx error is MySQL reporting a duplicate key
pub(crate) fn is_duplicate_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == ER_DUP_ENTRY;
        }
    }

    false
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: &RefreshSession) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO sessions (
                token_id, user_id, access_token_id, ip_address, location, device, os, login_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(session.token_id.to_string())
            .bind(session.user_id.to_string())
            .bind(session.access_token_id.to_string())
            .bind(&session.device.ip_address)
            .bind(&session.device.location)
            .bind(&session.device.device)
            .bind(&session.device.os)
            .bind(session.login_at)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    DomainError::Conflict {
                        resource: format!("session {}", session.token_id),
                    }
                } else {
                    query_error("save session", e)
                }
            })?;

        debug!(token_id = %session.token_id, user_id = %session.user_id, "session row created");
        Ok(())
    }

    async fn find_by_token_id(&self, token_id: TokenId) -> Result<Option<RefreshSession>, DomainError> {
        let query = format!("{} WHERE token_id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(token_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find session", e))?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn list(&self, user_id: UserId, active_only: bool) -> Result<Vec<RefreshSession>, DomainError> {
        let rows = if active_only {
            let query = format!(
                "{} WHERE user_id = ? AND expires_at > ? ORDER BY token_id DESC",
                SELECT_COLUMNS
            );
            sqlx::query(&query)
                .bind(user_id.to_string())
                .bind(Utc::now())
                .fetch_all(&self.pool)
                .await
        } else {
            let query = format!("{} WHERE user_id = ? ORDER BY token_id DESC", SELECT_COLUMNS);
            sqlx::query(&query)
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| query_error("list sessions", e))?;

        Self::rows_to_sessions(&rows)
    }

    async fn delete(&self, token_id: TokenId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_id = ?")
            .bind(token_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, user_id: UserId) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND expires_at <= ?")
            .bind(user_id.to_string())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete expired sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_all_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("sweep expired sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_active(&self, user_id: UserId) -> Result<usize, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS active FROM sessions WHERE user_id = ? AND expires_at > ?")
            .bind(user_id.to_string())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("count sessions", e))?;

        let active: i64 = row
            .try_get("active")
            .map_err(|e| DomainError::internal(format!("Failed to get active: {}", e)))?;

        Ok(active as usize)
    }
}
