//! Wiring of configuration, keys and backends into a shared session context

use std::sync::Arc;
use tracing::info;

use sk_core::services::{
    Rs256KeyManager, SessionCleanupService, SessionContext, SessionRotationCoordinator, TokenServiceConfig,
};
use sk_shared::{AppConfig, JwtConfig};

use crate::cache::{RedisClient, RedisRevocationCache};
use crate::database::{DatabasePool, MySqlSessionRepository};
use crate::InfrastructureError;

/// Session context over the Redis cache and the MySQL store
pub type SessionKeepContext = SessionContext<RedisRevocationCache, MySqlSessionRepository>;

/// Live connections plus the context built on top of them
pub struct Infrastructure {
    pub database: DatabasePool,
    pub redis: RedisClient,
    pub context: Arc<SessionKeepContext>,
}

impl Infrastructure {
    /// Load keys, connect to Redis and MySQL, and run migrations if enabled
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        let (access_keys, refresh_keys) = load_key_pairs(&config.auth.jwt)?;

        let redis = RedisClient::new(config.cache.clone()).await?;
        let database = DatabasePool::new(config.database.clone()).await?;

        if config.database.run_migrations {
            database.run_migrations().await?;
        }

        let context = Arc::new(SessionContext::new(
            TokenServiceConfig::from(&config.auth.jwt),
            access_keys,
            refresh_keys,
            Arc::new(RedisRevocationCache::new(redis.clone())),
            Arc::new(MySqlSessionRepository::new(database.get_pool().clone())),
        ));

        info!(
            issuer = %config.auth.jwt.issuer,
            can_sign = context.access_keys().can_sign() && context.refresh_keys().can_sign(),
            "session context ready"
        );

        Ok(Self {
            database,
            redis,
            context,
        })
    }

    /// Fails unless both backends answer
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let redis_ok = self.redis.health_check().await?;
        let database_ok = self.database.health_check().await?;

        if redis_ok && database_ok {
            Ok(())
        } else {
            Err(InfrastructureError::Config(format!(
                "unhealthy backends (redis: {}, database: {})",
                redis_ok, database_ok
            )))
        }
    }

    pub fn coordinator(&self) -> SessionRotationCoordinator<RedisRevocationCache, MySqlSessionRepository> {
        SessionRotationCoordinator::new(Arc::clone(&self.context))
    }

    pub fn cleanup_service(&self, config: &AppConfig) -> SessionCleanupService<MySqlSessionRepository> {
        SessionCleanupService::new(self.context.store_handle(), config.auth.cleanup.clone())
    }

    pub async fn shutdown(&self) {
        self.database.close().await;
    }
}

/// Access and refresh key managers from configuration
pub fn load_key_pairs(jwt: &JwtConfig) -> Result<(Rs256KeyManager, Rs256KeyManager), InfrastructureError> {
    let access = Rs256KeyManager::from_config(&jwt.access)
        .map_err(|e| InfrastructureError::Config(format!("access token keys: {}", e)))?;
    let refresh = Rs256KeyManager::from_config(&jwt.refresh)
        .map_err(|e| InfrastructureError::Config(format!("refresh token keys: {}", e)))?;

    Ok((access, refresh))
}
