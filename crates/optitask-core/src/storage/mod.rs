mod config;

pub use config::{ApiConfig, Config, NotificationsConfig, ScheduleConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/optitask[-dev]/` based on OPTITASK_ENV.
///
/// Set OPTITASK_ENV=dev to use the development data directory.
/// OPTITASK_CONFIG_DIR overrides the location entirely.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("OPTITASK_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".config");
            let env = std::env::var("OPTITASK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("optitask-dev")
            } else {
                base_dir.join("optitask")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
