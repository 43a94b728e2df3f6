//! Configuration loader for VascularGPT.
//!
//! Reads `vasculargpt.toml` and deserializes it into [`AppConfig`]. Falls
//! back to defaults when the file is missing or malformed.

use std::path::Path;

use vasculargpt_types::config::AppConfig;
use vasculargpt_types::error::ConfigError;

/// Default configuration file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vasculargpt.toml";

/// Parse configuration text. `path` is only used in error messages.
pub fn parse_app_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    toml::from_str::<AppConfig>(content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_app_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match parse_app_config(&content, path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            AppConfig::default()
        }
    }
}
