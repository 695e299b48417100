use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::get_settings_path;
use crate::error::Result;

fn default_max_history_items() -> usize {
    100
}

fn default_monitor_interval_ms() -> u64 {
    1000
}

fn default_theme() -> String {
    "auto".to_string()
}

/// Persisted user settings, a flat key-value JSON blob.
///
/// Unknown keys in the file are ignored and missing keys fall back to
/// defaults, so the file format can grow without migration. A corrupt or
/// missing file silently yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enable_encryption: bool,
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// scrypt verification hash, hex. Present iff encryption was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Salt for the verification hash, hex. Travels with `password_hash`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_salt: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_encryption: false,
            max_history_items: default_max_history_items(),
            monitor_interval_ms: default_monitor_interval_ms(),
            theme: default_theme(),
            password_hash: None,
            password_salt: None,
        }
    }
}

impl Settings {
    /// Load settings from the given path, or the default location.
    /// Missing or unparseable files fall back to defaults without error.
    pub fn load(path: Option<PathBuf>) -> Settings {
        let path = match path {
            Some(p) => p,
            None => match get_settings_path() {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("could not resolve settings path: {}", e);
                    return Settings::default();
                }
            },
        };

        match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("settings file corrupt, using defaults: {}", e);
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        }
    }

    /// Persist the full settings blob to the given path, or the default
    /// location, creating parent directories as needed.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let path = match path {
            Some(p) => p,
            None => get_settings_path()?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.enable_encryption);
        assert_eq!(settings.max_history_items, 100);
        assert_eq!(settings.monitor_interval_ms, 1000);
        assert_eq!(settings.theme, "auto");
        assert!(settings.password_hash.is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.enable_encryption = true;
        settings.password_hash = Some("abcd".to_string());
        settings.password_salt = Some("1234".to_string());
        settings.save(Some(path.clone())).unwrap();

        let loaded = Settings::load(Some(path));
        assert!(loaded.enable_encryption);
        assert_eq!(loaded.password_hash.as_deref(), Some("abcd"));
        assert_eq!(loaded.password_salt.as_deref(), Some("1234"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let loaded = Settings::load(Some(dir.path().join("nope.json")));
        assert!(!loaded.enable_encryption);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json!").unwrap();
        let loaded = Settings::load(Some(path));
        assert_eq!(loaded.max_history_items, 100);
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"enableEncryption": true}"#).unwrap();
        let loaded = Settings::load(Some(path));
        assert!(loaded.enable_encryption);
        assert_eq!(loaded.max_history_items, 100);
    }
}
