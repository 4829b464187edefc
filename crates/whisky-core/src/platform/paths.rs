//! Platform-specific per-user directories.
//!
//! # Platform Behavior
//! - **macOS**: `~/Library/Application Support/<bundle id>` and
//!   `~/Library/Containers/<bundle id>`
//! - **Linux**: `$XDG_DATA_HOME/<bundle id>` and `$XDG_CONFIG_HOME/<bundle id>`
//! - **Windows**: `%APPDATA%\<bundle id>` for both, the container under
//!   `Containers`

use crate::config::AppConfig;
use crate::error::{Result, WhiskyError};
use std::path::PathBuf;

/// Directory holding the WhiskyWine distribution (`Libraries/...`).
///
/// Reinstalling the runtime deletes and recreates this directory, so nothing
/// else may be stored in it.
pub fn application_folder() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| WhiskyError::Config {
        message: "Could not determine application data directory".to_string(),
    })?;
    Ok(data_dir.join(AppConfig::BUNDLE_IDENTIFIER))
}

/// Directory holding registry state (bottle list, default bottle folder).
pub fn container_folder() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let home = dirs::home_dir().ok_or_else(|| WhiskyError::Config {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home
            .join("Library")
            .join("Containers")
            .join(AppConfig::BUNDLE_IDENTIFIER))
    }

    #[cfg(target_os = "windows")]
    {
        let data_dir = dirs::data_dir().ok_or_else(|| WhiskyError::Config {
            message: "Could not determine app data directory".to_string(),
        })?;
        Ok(data_dir
            .join("Containers")
            .join(AppConfig::BUNDLE_IDENTIFIER))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let config_dir = dirs::config_dir().ok_or_else(|| WhiskyError::Config {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join(AppConfig::BUNDLE_IDENTIFIER))
    }
}
