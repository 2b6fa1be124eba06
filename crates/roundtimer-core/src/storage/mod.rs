mod config;

pub use config::{Config, NotificationsConfig, TimerSection};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/roundtimer/`, or `$ROUNDTIMER_CONFIG_DIR` when set.
///
/// # Errors
/// Returns an error if no home directory can be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("ROUNDTIMER_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(".config")
            .join("roundtimer"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
