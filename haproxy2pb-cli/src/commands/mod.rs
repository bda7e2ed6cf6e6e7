//! Command handlers -- one module per subcommand

pub mod config;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod stats;

use std::path::Path;

use haproxy2pb_core::config::Haproxy2pbConfig;
use haproxy2pb_core::error::{ConfigError, Haproxy2pbError};

use crate::error::CliError;

/// Load the effective configuration for a run.
///
/// A missing file falls back to defaults. Environment overrides and the
/// `--log-level` flag are applied on top, then the result is validated.
pub async fn load_config(
    path: &Path,
    log_level: Option<&str>,
) -> Result<Haproxy2pbConfig, CliError> {
    let mut config = match Haproxy2pbConfig::from_file(path).await {
        Ok(config) => config,
        Err(Haproxy2pbError::Config(ConfigError::FileNotFound { .. })) => {
            Haproxy2pbConfig::default()
        }
        Err(e) => return Err(CliError::Config(e.to_string())),
    };

    config.apply_env_overrides();
    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(config)
}
