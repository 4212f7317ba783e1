//! Validation of presented tokens against signature and cache liveness

use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{decode, Algorithm, Validation};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::{Claims, SessionDescriptor, TokenId, TokenKind, UserId};
use crate::domain::value_objects::ValidatedRefresh;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RevocationCache, SessionRepository};
use crate::services::context::SessionContext;

use super::config::TokenServiceConfig;
use super::key_manager::Rs256KeyManager;

/// Checks tokens in a fixed order: signature and time claims, then cache
/// presence, then the cached payload against the signed subject.
///
/// Only public keys are used, so a validator can run in a process that
/// holds no private key.
pub struct TokenValidator<C, S> {
    ctx: Arc<SessionContext<C, S>>,
    validation: Validation,
}

impl<C, S> TokenValidator<C, S>
where
    C: RevocationCache,
    S: SessionRepository,
{
    pub fn new(ctx: Arc<SessionContext<C, S>>) -> Self {
        let validation = build_validation(ctx.config());
        Self { ctx, validation }
    }

    /// Validates an access token
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, expiry and cache entry all check out
    /// * `Err` kind `Malformed` - Bad structure, signature, issuer, audience or kind
    /// * `Err` kind `Expired` - Signature valid but `exp` has passed
    /// * `Err` kind `Unauthorized` - No live cache entry, or it names another user
    /// * `Err` kind `Internal` - Cache backend failure
    pub async fn validate_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.verify(token, self.ctx.access_keys(), TokenKind::Access)?;
        let payload = self.live_payload(claims.jti).await?;

        let cached_user: Option<UserId> = payload.trim().parse().ok();
        if cached_user != Some(claims.sub) {
            warn!(token_id = %claims.jti, "access token subject does not match its cache entry");
            return Err(TokenError::Unauthorized.into());
        }

        Ok(claims)
    }

    /// Validates a refresh token and returns its cached session descriptor
    ///
    /// Fails with the same kinds as [`Self::validate_access_token`]. A cached
    /// descriptor that cannot be decoded, names a different user, or links a
    /// different access token than the signed claims is `Unauthorized`.
    pub async fn validate_refresh_token(&self, token: &str) -> Result<ValidatedRefresh, DomainError> {
        let claims = self.verify(token, self.ctx.refresh_keys(), TokenKind::Refresh)?;
        let payload = self.live_payload(claims.jti).await?;

        let descriptor = SessionDescriptor::from_payload(&payload).map_err(|e| {
            warn!(token_id = %claims.jti, "undecodable session descriptor: {}", e);
            DomainError::from(TokenError::Unauthorized)
        })?;

        if descriptor.user_id != claims.sub {
            warn!(token_id = %claims.jti, "refresh token subject does not match its session");
            return Err(TokenError::Unauthorized.into());
        }

        if claims
            .access_token_id
            .is_some_and(|linked| linked != descriptor.access_token_id)
        {
            warn!(token_id = %claims.jti, "refresh token links a different access token than its session");
            return Err(TokenError::Unauthorized.into());
        }

        Ok(ValidatedRefresh { claims, descriptor })
    }

    /// Signature, expiry and standard claim checks, using only the public key
    fn verify(&self, token: &str, keys: &Rs256KeyManager, expected: TokenKind) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, keys.decoding_key(), &self.validation).map_err(map_decode_error)?;

        // The decoder lets `exp == now` through and applies the leeway to exp.
        // Expiry is checked here, ahead of the cache lookup.
        if data.claims.is_expired() {
            debug!(token_id = %data.claims.jti, "token expired");
            return Err(TokenError::Expired.into());
        }

        if data.claims.kind != expected {
            debug!(token_id = %data.claims.jti, "token kind mismatch");
            return Err(TokenError::Malformed.into());
        }

        Ok(data.claims)
    }

    /// Cache payload for a token id; absence means revoked
    async fn live_payload(&self, token_id: TokenId) -> Result<String, DomainError> {
        match self.ctx.cache().get(token_id).await? {
            Some(payload) => Ok(payload),
            None => {
                debug!(%token_id, "token has no live cache entry");
                Err(TokenError::Unauthorized.into())
            }
        }
    }
}

fn build_validation(config: &TokenServiceConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_audience(&[config.audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
    // Only widens the nbf check; exp is enforced without leeway in `verify`
    validation.leeway = config.leeway_seconds;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation
}

/// Expired stays Expired; key problems are ours; everything else is the token's fault
pub(crate) fn map_decode_error(err: JwtError) -> DomainError {
    match err.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired.into(),
        JwtErrorKind::InvalidRsaKey(_)
        | JwtErrorKind::InvalidKeyFormat
        | JwtErrorKind::RsaFailedSigning
        | JwtErrorKind::Crypto(_) => TokenError::KeyUnavailable {
            message: err.to_string(),
        }
        .into(),
        _ => TokenError::Malformed.into(),
    }
}
