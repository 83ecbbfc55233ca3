//! Configuration loader for Telephonist.
//!
//! Reads `config.toml` (by default from the data directory, `~/.telephonist/`
//! in production) into [`TelephonistConfig`] and layers the translator
//! credentials from the environment on top.

use std::path::{Path, PathBuf};

use telephonist_types::config::TelephonistConfig;
use telephonist_types::error::ConfigError;

/// Environment variable holding the translator API key.
pub const TRANSLATE_KEY_ENV: &str = "YA_TRANSLATE_KEY";
/// Environment variable holding the translator cloud folder id.
pub const FOLDER_ID_ENV: &str = "YA_FOLDER_ID";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TELEPHONIST_DATA_DIR";

/// Resolve the data directory: `TELEPHONIST_DATA_DIR`, else `~/.telephonist`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".telephonist")
}

/// Load configuration.
///
/// - `explicit` set: the file must exist and parse, otherwise this fails.
/// - `explicit` unset: `{data_dir}/config.toml` is read if present; a
///   malformed default file logs a warning and yields defaults.
///
/// Environment overrides are applied in both cases.
pub async fn load_config(
    explicit: Option<&Path>,
    data_dir: &Path,
) -> Result<TelephonistConfig, ConfigError> {
    let config = match explicit {
        Some(path) => read_config_file(path).await?,
        None => load_default_config(data_dir).await,
    };
    Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
}

async fn read_config_file(path: &Path) -> Result<TelephonistConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

async fn load_default_config(data_dir: &Path) -> TelephonistConfig {
    let config_path = data_dir.join("config.toml");

    match tokio::fs::metadata(&config_path).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return TelephonistConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to stat {}: {err}, using defaults", config_path.display());
            return TelephonistConfig::default();
        }
    }

    match read_config_file(&config_path).await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            TelephonistConfig::default()
        }
    }
}

/// Overlay translator credentials from the environment.
///
/// Non-empty variables win over the file.
pub fn apply_env_overrides<F>(mut config: TelephonistConfig, lookup: F) -> TelephonistConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(key) = non_empty(TRANSLATE_KEY_ENV) {
        config.translator.api_key = Some(key);
    }
    if let Some(folder) = non_empty(FOLDER_ID_ENV) {
        config.translator.folder_id = Some(folder);
    }
    config
}
