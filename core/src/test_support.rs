//! Fixtures shared by the service tests

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::{Claims, TokenId, UserId};
use crate::repositories::{MockRevocationCache, MockSessionRepository};
use crate::services::context::SessionContext;
use crate::services::token::{Rs256KeyManager, TokenServiceConfig};

pub const ACCESS_PRIVATE_PEM: &str = include_str!("../test-keys/access_private.pem");
pub const ACCESS_PUBLIC_PEM: &str = include_str!("../test-keys/access_public.pem");
pub const REFRESH_PRIVATE_PEM: &str = include_str!("../test-keys/refresh_private.pem");
pub const REFRESH_PUBLIC_PEM: &str = include_str!("../test-keys/refresh_public.pem");

pub type TestContext = SessionContext<MockRevocationCache, MockSessionRepository>;

pub struct Fixture {
    pub ctx: Arc<TestContext>,
    pub cache: Arc<MockRevocationCache>,
    pub store: Arc<MockSessionRepository>,
}

pub fn access_keys() -> Rs256KeyManager {
    Rs256KeyManager::from_pem_strings(ACCESS_PRIVATE_PEM, ACCESS_PUBLIC_PEM).unwrap()
}

pub fn refresh_keys() -> Rs256KeyManager {
    Rs256KeyManager::from_pem_strings(REFRESH_PRIVATE_PEM, REFRESH_PUBLIC_PEM).unwrap()
}

pub fn fixture() -> Fixture {
    fixture_with(TokenServiceConfig::default())
}

pub fn fixture_with(config: TokenServiceConfig) -> Fixture {
    let cache = Arc::new(MockRevocationCache::new());
    let store = Arc::new(MockSessionRepository::new());
    let ctx = Arc::new(SessionContext::new(
        config,
        access_keys(),
        refresh_keys(),
        Arc::clone(&cache),
        Arc::clone(&store),
    ));

    Fixture { ctx, cache, store }
}

pub fn user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

/// Access claims for `user_id` whose `exp` lies `offset_secs` from now
pub fn access_claims(user_id: UserId, offset_secs: i64) -> Claims {
    let config = TokenServiceConfig::default();
    let now = Utc::now();
    let expires_at = now + chrono::Duration::seconds(offset_secs);
    let issued_at = expires_at.min(now) - chrono::Duration::seconds(60);
    Claims::new_access(
        user_id,
        TokenId::generate(),
        issued_at,
        expires_at,
        &config.issuer,
        &config.audience,
    )
}

/// Refresh claims linked to `access_token_id`, expiring `offset_secs` from now
pub fn refresh_claims(user_id: UserId, access_token_id: TokenId, offset_secs: i64) -> Claims {
    let access = access_claims(user_id, offset_secs);
    let issued_at = chrono::DateTime::<Utc>::from_timestamp(access.iat, 0).unwrap();
    let expires_at = chrono::DateTime::<Utc>::from_timestamp(access.exp, 0).unwrap();
    Claims::new_refresh(
        user_id,
        TokenId::generate(),
        issued_at,
        expires_at,
        &access.iss,
        &access.aud,
        access_token_id,
    )
}

/// Signs arbitrary claims with the given key pair
pub fn sign_with(claims: &Claims, keys: &Rs256KeyManager) -> String {
    crate::services::token::sign_claims(claims, keys).unwrap()
}

pub const MINUTE: Duration = Duration::from_secs(60);
