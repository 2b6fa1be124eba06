//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default focus/break durations and round count
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/roundtimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{normalize, TimerConfig, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN, DEFAULT_ROUNDS};

/// Defaults for new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on persistent notifications.
    #[serde(default)]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/roundtimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_focus_duration() -> u32 {
    DEFAULT_FOCUS_MIN
}
fn default_break_duration() -> u32 {
    DEFAULT_BREAK_MIN
}
fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}
fn default_true() -> bool {
    true
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
            rounds: default_rounds(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: false,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        for part in parent.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| invalid(e.to_string()))?
                    .into(),
            ),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("not a leaf key".into()).into());
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory only.
    ///
    /// `timer.*` values go through the same normalization as interactive
    /// input, so `timer.rounds = abc` stores the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or a non-timer value cannot be
    /// parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "timer.focus_duration" => {
                self.timer.focus_duration = normalize(value, DEFAULT_FOCUS_MIN);
            }
            "timer.break_duration" => {
                self.timer.break_duration = normalize(value, DEFAULT_BREAK_MIN);
            }
            "timer.rounds" => {
                self.timer.rounds = normalize(value, DEFAULT_ROUNDS);
            }
            _ => {
                let mut json = serde_json::to_value(&*self)?;
                Self::set_json_value_by_path(&mut json, key, value)?;
                *self = serde_json::from_value(json)?;
            }
        }
        Ok(())
    }

    /// Session configuration built from the stored defaults.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::new(
            self.timer.focus_duration,
            self.timer.break_duration,
            self.timer.rounds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.timer.focus_duration, 25);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nrounds = 6\n").unwrap();
        assert_eq!(parsed.timer.rounds, 6);
        assert_eq!(parsed.timer.break_duration, 5);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.rounds").as_deref(), Some("4"));
        assert_eq!(cfg.get("notifications.bell").as_deref(), Some("false"));
        assert_eq!(cfg.get("timer.nope"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_timer_keys_normalizes() {
        let mut cfg = Config::default();
        cfg.set("timer.focus_duration", "50").unwrap();
        assert_eq!(cfg.timer.focus_duration, 50);
        cfg.set("timer.focus_duration", "-1").unwrap();
        assert_eq!(cfg.timer.focus_duration, 25);
        cfg.set("timer.rounds", "lots").unwrap();
        assert_eq!(cfg.timer.rounds, 4);
    }

    #[test]
    fn set_bool_and_unknown_keys() {
        let mut cfg = Config::default();
        cfg.set("notifications.bell", "true").unwrap();
        assert!(cfg.notifications.bell);
        assert!(cfg.set("notifications.bell", "maybe").is_err());
        assert!(matches!(
            cfg.set("ui.theme", "dark"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("notifications", "x").is_err());
    }

    #[test]
    fn zero_from_file_becomes_default_in_session() {
        let mut cfg = Config::default();
        cfg.timer.break_duration = 0;
        assert_eq!(cfg.timer_config().break_duration_min(), 5);
    }

    #[test]
    fn load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("timer.rounds", "7").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.rounds, 7);
    }

    #[test]
    fn garbage_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
