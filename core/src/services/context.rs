//! The handles every session component works through.

use std::sync::Arc;

use crate::repositories::{RevocationCache, SessionRepository};
use crate::services::token::{Rs256KeyManager, TokenServiceConfig};

/// Signing keys, revocation cache, session store and token settings.
///
/// Built once at startup and shared by `Arc` with the issuer, the validator
/// and the coordinator.
pub struct SessionContext<C, S> {
    config: TokenServiceConfig,
    access_keys: Rs256KeyManager,
    refresh_keys: Rs256KeyManager,
    cache: Arc<C>,
    store: Arc<S>,
}

impl<C, S> SessionContext<C, S>
where
    C: RevocationCache,
    S: SessionRepository,
{
    pub fn new(
        config: TokenServiceConfig,
        access_keys: Rs256KeyManager,
        refresh_keys: Rs256KeyManager,
        cache: Arc<C>,
        store: Arc<S>,
    ) -> Self {
        Self {
            config,
            access_keys,
            refresh_keys,
            cache,
            store,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn access_keys(&self) -> &Rs256KeyManager {
        &self.access_keys
    }

    pub fn refresh_keys(&self) -> &Rs256KeyManager {
        &self.refresh_keys
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shared handle to the session store, as the cleanup task needs
    pub fn store_handle(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }
}

impl<C, S> std::fmt::Debug for SessionContext<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("config", &self.config)
            .field("access_keys", &self.access_keys)
            .field("refresh_keys", &self.refresh_keys)
            .finish_non_exhaustive()
    }
}
