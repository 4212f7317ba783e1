//! Minting of access and refresh tokens

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::entities::{
    Claims, DeviceMeta, IssuedToken, RefreshSession, SessionDescriptor, TokenId, UserId,
};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RevocationCache, SessionRepository};
use crate::services::context::SessionContext;

use super::key_manager::Rs256KeyManager;

/// Attempts at persisting a refresh session before a duplicate id is fatal
const MAX_PERSIST_ATTEMPTS: u32 = 2;

/// Signs tokens and registers them with the revocation cache
pub struct TokenIssuer<C, S> {
    ctx: Arc<SessionContext<C, S>>,
}

impl<C, S> TokenIssuer<C, S>
where
    C: RevocationCache,
    S: SessionRepository,
{
    pub fn new(ctx: Arc<SessionContext<C, S>>) -> Self {
        Self { ctx }
    }

    /// Creates a signed access token and makes it live in the cache
    ///
    /// # Arguments
    ///
    /// * `user_id` - Subject of the token
    /// * `ttl` - Lifetime of both the signature and the cache entry
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - Encoded token, its id and expiry
    /// * `Err(DomainError)` - Signing or cache failure (kind `Internal`)
    pub async fn create_access_token(&self, user_id: UserId, ttl: Duration) -> Result<IssuedToken, DomainError> {
        let (issued_at, expires_at) = lifetime(ttl)?;
        let config = self.ctx.config();
        let token_id = TokenId::generate();

        let claims = Claims::new_access(
            user_id,
            token_id,
            issued_at,
            expires_at,
            &config.issuer,
            &config.audience,
        );
        let token = sign(&claims, self.ctx.access_keys())?;

        self.ctx
            .cache()
            .set(token_id, &user_id.to_string(), ttl)
            .await?;

        debug!(%user_id, %token_id, "issued access token");

        Ok(IssuedToken {
            token,
            token_id,
            expires_at,
        })
    }

    /// Creates a signed refresh token, persists its session row and makes it
    /// live in the cache
    ///
    /// The row is written before the cache entry, so an interruption in
    /// between leaves a session that exists but can never validate.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Subject of the token
    /// * `ttl` - Lifetime of the signature, the row and the cache entry
    /// * `device` - Device metadata stored with the session
    /// * `access_token_id` - Access token issued in the same login
    pub async fn create_refresh_token(
        &self,
        user_id: UserId,
        ttl: Duration,
        device: DeviceMeta,
        access_token_id: TokenId,
    ) -> Result<IssuedToken, DomainError> {
        let (issued_at, expires_at) = lifetime(ttl)?;
        let config = self.ctx.config();
        let mut attempt = 0;

        let (token, session) = loop {
            attempt += 1;
            let token_id = TokenId::generate();
            let claims = Claims::new_refresh(
                user_id,
                token_id,
                issued_at,
                expires_at,
                &config.issuer,
                &config.audience,
                access_token_id,
            );
            let token = sign(&claims, self.ctx.refresh_keys())?;

            let session = RefreshSession {
                token_id,
                user_id,
                device: device.clone(),
                login_at: issued_at,
                expires_at,
                access_token_id,
            };

            match self.ctx.store().create(&session).await {
                Ok(()) => break (token, session),
                Err(DomainError::Conflict { resource }) if attempt < MAX_PERSIST_ATTEMPTS => {
                    warn!(%token_id, %resource, "refresh token id collision, regenerating");
                }
                Err(DomainError::Conflict { resource }) => {
                    error!(%token_id, "refresh token id collided on every attempt");
                    return Err(DomainError::internal(format!(
                        "could not persist {} after {} attempts",
                        resource, attempt
                    )));
                }
                Err(e) => return Err(e),
            }
        };

        let descriptor = SessionDescriptor::from(&session);
        let payload = descriptor
            .to_payload()
            .map_err(|e| DomainError::internal(format!("Failed to encode session descriptor: {}", e)))?;

        if let Err(e) = self.ctx.cache().set(session.token_id, &payload, ttl).await {
            error!(token_id = %session.token_id, "failed to register refresh token: {}", e);
            match self.ctx.store().delete(session.token_id).await {
                Ok(_) => debug!(token_id = %session.token_id, "removed unregistered session row"),
                Err(cleanup) => warn!(
                    token_id = %session.token_id,
                    "unregistered session row left for the sweep: {}", cleanup
                ),
            }
            return Err(e);
        }

        debug!(%user_id, token_id = %session.token_id, %access_token_id, "issued refresh token");

        Ok(IssuedToken {
            token,
            token_id: session.token_id,
            expires_at,
        })
    }
}

/// Issue and expiry instants for a token living `ttl`, in whole seconds
fn lifetime(ttl: Duration) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    if ttl.as_secs() == 0 {
        return Err(DomainError::internal("token ttl must be at least one second"));
    }

    let issued_at = Utc::now().trunc_subsecs(0);
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .ok_or_else(|| DomainError::internal(format!("token ttl {:?} is out of range", ttl)))?;

    Ok((issued_at, expires_at))
}

/// Signs claims with a key pair's private key
pub(crate) fn sign(claims: &Claims, keys: &Rs256KeyManager) -> Result<String, DomainError> {
    let header = Header::new(Algorithm::RS256);
    encode(&header, claims, keys.encoding_key()?).map_err(|e| {
        DomainError::Token(TokenError::SigningFailed {
            message: e.to_string(),
        })
    })
}
