use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base config directory (universal ~/.config/mcm-export/ on Unix-like systems)
pub fn config_dir() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("mcm-export"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("mcm-export"))
    }
}

/// Settings file path (config.json under the config directory)
pub fn settings_json() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}
