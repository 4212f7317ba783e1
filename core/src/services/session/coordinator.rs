//! Login, refresh and logout flows over the issuer, validator, cache and store

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Claims, DeviceMeta, IssuedToken, RefreshSession, SessionDescriptor, TokenId, UserId};
use crate::domain::value_objects::{Caller, DeviceLogoutOutcome, LoginResult, ValidatedRefresh};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RevocationCache, SessionRepository};
use crate::services::context::SessionContext;
use crate::services::token::{TokenIssuer, TokenValidator};

/// Composes token issuing, validation and revocation into session flows
///
/// Holds no mutable state of its own; every call goes straight to the cache
/// and the store, so one instance can be shared across request handlers.
pub struct SessionRotationCoordinator<C, S> {
    ctx: Arc<SessionContext<C, S>>,
    issuer: TokenIssuer<C, S>,
    validator: TokenValidator<C, S>,
}

impl<C, S> SessionRotationCoordinator<C, S>
where
    C: RevocationCache,
    S: SessionRepository,
{
    pub fn new(ctx: Arc<SessionContext<C, S>>) -> Self {
        Self {
            issuer: TokenIssuer::new(Arc::clone(&ctx)),
            validator: TokenValidator::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    pub fn context(&self) -> &SessionContext<C, S> {
        &self.ctx
    }

    /// Opens a session: an access token, then a refresh token linked to it
    ///
    /// If the refresh half cannot be created the access cache entry is
    /// removed again before the error is returned.
    pub async fn login(&self, user_id: UserId, device: DeviceMeta) -> Result<LoginResult, DomainError> {
        let config = self.ctx.config();
        let access = self.issuer.create_access_token(user_id, config.access_ttl).await?;

        let refresh = match self
            .issuer
            .create_refresh_token(user_id, config.refresh_ttl, device, access.token_id)
            .await
        {
            Ok(refresh) => refresh,
            Err(e) => {
                error!(%user_id, "login failed creating refresh token: {}", e);
                if let Err(cleanup) = self.ctx.cache().del(access.token_id).await {
                    warn!(token_id = %access.token_id, "orphaned access token left to expire: {}", cleanup);
                }
                return Err(e);
            }
        };

        info!(%user_id, refresh_token_id = %refresh.token_id, "session opened");

        Ok(LoginResult { access, refresh })
    }

    /// Mints a new access token from a live refresh token
    ///
    /// The refresh token itself is left untouched.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, DomainError> {
        let validated = self.validate_refresh(refresh_token).await?;
        let access = self
            .issuer
            .create_access_token(validated.user_id(), self.ctx.config().access_ttl)
            .await?;

        debug!(
            user_id = %validated.user_id(),
            refresh_token_id = %validated.token_id(),
            access_token_id = %access.token_id,
            "access token refreshed"
        );

        Ok(access)
    }

    /// Revokes the session a refresh token belongs to
    pub async fn logout(&self, refresh_token: &str) -> Result<(), DomainError> {
        let validated = self.validate_refresh(refresh_token).await?;
        self.delete_session(validated.token_id(), validated.descriptor.access_token_id)
            .await?;

        info!(user_id = %validated.user_id(), refresh_token_id = %validated.token_id(), "session closed");
        Ok(())
    }

    /// Revokes one of the caller's sessions by its refresh token id
    ///
    /// # Returns
    ///
    /// * `Ok(DeviceLogoutOutcome)` - Session revoked; the flag tells whether it
    ///   was the caller's own
    /// * `Err` kind `BadRequest` - No live session under that id
    /// * `Err` kind `Unauthorized` - Session belongs to someone else; nothing deleted
    /// * `Err` kind `Internal` - Cached descriptor cannot be decoded
    pub async fn logout_from_device(
        &self,
        caller: Caller,
        target_token_id: TokenId,
    ) -> Result<DeviceLogoutOutcome, DomainError> {
        let Some(payload) = self.ctx.cache().get(target_token_id).await? else {
            if let Err(e) = self.ctx.store().delete_expired(caller.user_id).await {
                warn!(user_id = %caller.user_id, "expired session sweep failed: {}", e);
            }
            return Err(DomainError::BadRequest {
                message: format!("session {} is not active", target_token_id),
            });
        };

        let descriptor = SessionDescriptor::from_payload(&payload).map_err(|e| {
            error!(token_id = %target_token_id, "undecodable session descriptor: {}", e);
            DomainError::internal(format!("undecodable session descriptor for {}", target_token_id))
        })?;

        if descriptor.user_id != caller.user_id {
            warn!(
                user_id = %caller.user_id,
                token_id = %target_token_id,
                "device logout attempted on a session owned by another user"
            );
            return Err(DomainError::Unauthorized);
        }

        self.delete_session(target_token_id, descriptor.access_token_id)
            .await?;

        let revoked_current_session = descriptor.access_token_id == caller.access_token_id;
        info!(
            user_id = %caller.user_id,
            token_id = %target_token_id,
            revoked_current_session,
            "device logged out"
        );

        Ok(DeviceLogoutOutcome {
            revoked_current_session,
        })
    }

    /// Deletes the user's expired session rows
    pub async fn sweep_expired(&self, user_id: UserId) -> Result<usize, DomainError> {
        let removed = self.ctx.store().delete_expired(user_id).await?;
        debug!(%user_id, removed, "swept expired sessions");
        Ok(removed)
    }

    /// Lists the user's sessions, newest first
    pub async fn list_sessions(&self, user_id: UserId, active_only: bool) -> Result<Vec<RefreshSession>, DomainError> {
        self.ctx.store().list(user_id, active_only).await
    }

    /// Looks up one of the caller's sessions
    pub async fn find_session(&self, caller: Caller, token_id: TokenId) -> Result<RefreshSession, DomainError> {
        let session = self
            .ctx
            .store()
            .find_by_token_id(token_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("session {}", token_id),
            })?;

        if session.user_id != caller.user_id {
            return Err(DomainError::Unauthorized);
        }

        Ok(session)
    }

    pub async fn issue_access(&self, user_id: UserId) -> Result<IssuedToken, DomainError> {
        self.issuer
            .create_access_token(user_id, self.ctx.config().access_ttl)
            .await
    }

    pub async fn issue_refresh(
        &self,
        user_id: UserId,
        device: DeviceMeta,
        access_token_id: TokenId,
    ) -> Result<IssuedToken, DomainError> {
        self.issuer
            .create_refresh_token(user_id, self.ctx.config().refresh_ttl, device, access_token_id)
            .await
    }

    pub async fn validate_access(&self, token: &str) -> Result<Claims, DomainError> {
        self.validator.validate_access_token(token).await
    }

    /// Like [`TokenValidator::validate_refresh_token`], with an expired
    /// signature reported as `SessionExpired`
    pub async fn validate_refresh(&self, token: &str) -> Result<ValidatedRefresh, DomainError> {
        self.validator
            .validate_refresh_token(token)
            .await
            .map_err(|e| match e {
                DomainError::Token(TokenError::Expired) => DomainError::SessionExpired,
                other => other,
            })
    }

    /// Removes both cache entries of a session, then its row
    ///
    /// Both deletes are always attempted. If both fail the cache error is
    /// returned and the store error only logged.
    pub async fn delete_session(&self, refresh_token_id: TokenId, access_token_id: TokenId) -> Result<(), DomainError> {
        let cached = self
            .ctx
            .cache()
            .del_pair(refresh_token_id, access_token_id)
            .await;
        let stored = self.ctx.store().delete(refresh_token_id).await;

        match (cached, stored) {
            (Ok(entries), Ok(row)) => {
                debug!(%refresh_token_id, %access_token_id, entries, row, "session deleted");
                Ok(())
            }
            (Err(cache_err), Ok(_)) => {
                error!(%refresh_token_id, "session row deleted but cache entries remain: {}", cache_err);
                Err(cache_err)
            }
            (Ok(_), Err(store_err)) => {
                error!(%refresh_token_id, "cache entries deleted but session row remains: {}", store_err);
                Err(store_err)
            }
            (Err(cache_err), Err(store_err)) => {
                error!(%refresh_token_id, "session store delete failed: {}", store_err);
                error!(%refresh_token_id, "session cache delete failed: {}", cache_err);
                Err(cache_err)
            }
        }
    }
}
