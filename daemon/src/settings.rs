//! Command line and layered configuration loading

use anyhow::{anyhow, Result};
use clap::Parser;
use config::{Config, Environment as EnvSource, File};

use sk_shared::AppConfig;

/// Prefix of environment variables overriding any other source
pub const ENV_PREFIX: &str = "SESSIONKEEP";

#[derive(Parser, Debug)]
#[command(name = "sessionkeepd", version, about = "Session and token lifecycle daemon")]
pub struct Cli {
    /// Optional TOML file layered over the environment defaults
    #[arg(long)]
    pub settings: Option<String>,

    /// Run one cleanup cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Build the application configuration
///
/// Sources, lowest precedence first: `AppConfig::from_env()`, the settings
/// file when given, then `SESSIONKEEP__SECTION__FIELD` variables.
pub fn load_settings(path: Option<&str>) -> Result<AppConfig> {
    layer(&AppConfig::from_env(), path)
}

pub(crate) fn layer(defaults: &AppConfig, path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder().add_source(Config::try_from(defaults).map_err(|e| anyhow!(e))?);

    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    builder
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))
}
