use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use sk_infra::Infrastructure;

mod logger;
mod settings;

use settings::{load_settings, Cli};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_settings(cli.settings.as_deref())?;
    logger::init(&config.logging)?;

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting SessionKeep daemon"
    );

    let infra = Infrastructure::connect(&config).await?;
    infra.health_check().await?;
    info!("{}", infra.database.get_statistics());

    if !infra.context.access_keys().can_sign() || !infra.context.refresh_keys().can_sign() {
        warn!("No private key for one of the key pairs; this instance can only validate tokens");
    }

    let cleanup = Arc::new(infra.cleanup_service(&config));

    if cli.once {
        let result = cleanup.run_cleanup().await?;
        infra.shutdown().await;
        return if result.is_success() {
            info!(deleted = result.expired_sessions_deleted, "cleanup finished");
            Ok(())
        } else {
            Err(anyhow!("cleanup failed: {}", result.errors.join("; ")))
        };
    }

    let task = Arc::clone(&cleanup).start_background_task();

    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    if let Some(task) = task {
        task.abort();
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, infra.shutdown()).await {
        Ok(_) => info!("daemon shutdown successfully"),
        Err(_) => error!("daemon shutdown timed out"),
    }

    Ok(())
}
