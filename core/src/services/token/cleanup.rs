//! Periodic removal of expired refresh session rows
//!
//! Cache entries expire on their own TTL; only the durable rows need sweeping.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use sk_shared::CleanupConfig;

use crate::errors::DomainError;
use crate::repositories::SessionRepository;

/// Service that sweeps expired sessions for every user
pub struct SessionCleanupService<S: SessionRepository + 'static> {
    repository: Arc<S>,
    config: CleanupConfig,
}

impl<S: SessionRepository> SessionCleanupService<S> {
    pub fn new(repository: Arc<S>, config: CleanupConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Run a single cleanup cycle
    ///
    /// A store failure is recorded in the result rather than returned, so the
    /// background loop keeps going.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting session cleanup cycle");

        let mut result = CleanupResult::default();

        match self.repository.delete_all_expired().await {
            Ok(count) => {
                result.expired_sessions_deleted = count;
                info!("Deleted {} expired sessions", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired sessions: {}", e);
                result.errors.push(format!("Session cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Spawn the cleanup loop on the current runtime
    ///
    /// Returns `None` when cleanup is disabled. The first cycle runs
    /// immediately, then once per configured interval.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.config.interval_seconds.max(1));

        let handle = tokio::spawn(async move {
            info!(
                "Session cleanup service started - will run every {} seconds",
                interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) if !result.is_success() => {
                        warn!("Cleanup completed with errors: {:?}", result.errors);
                    }
                    Ok(_) => {}
                    Err(e) => error!("Session cleanup cycle failed: {}", e),
                }
            }
        });

        Some(handle)
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired session rows deleted
    pub expired_sessions_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
