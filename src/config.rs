//! Configuration handling for the intake form

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "patient-intake-v1";

const DEFAULT_INPUT_DEBOUNCE_MS: u64 = 60;
const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 80;
const DEFAULT_SUBMISSION_DELAY_MS: u64 = 900;

/// User configuration; every setting is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Name of the saved-progress record
    pub storage_key: Option<String>,
    /// Directory holding saved progress (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Set to false to keep progress in memory only
    pub autosave: Option<bool>,
    /// Pause after typing before a field is validated and saved
    pub input_debounce_ms: Option<u64>,
    /// Pause after typing before the provider list is filtered
    pub filter_debounce_ms: Option<u64>,
    /// Duration of the simulated submission
    pub submission_delay_ms: Option<u64>,
    /// Start in high contrast when there is no saved progress
    pub high_contrast: Option<bool>,
}

impl IntakeConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "intake", "intake-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: IntakeConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    /// Where saved progress lives, if anywhere
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }

    pub fn autosave(&self) -> bool {
        self.autosave.unwrap_or(true)
    }

    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms.unwrap_or(DEFAULT_INPUT_DEBOUNCE_MS))
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms.unwrap_or(DEFAULT_FILTER_DEBOUNCE_MS))
    }

    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(
            self.submission_delay_ms
                .unwrap_or(DEFAULT_SUBMISSION_DELAY_MS),
        )
    }

    pub fn high_contrast(&self) -> bool {
        self.high_contrast.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = IntakeConfig::default();
        assert_eq!(config.storage_key(), "patient-intake-v1");
        assert!(config.autosave());
        assert_eq!(config.input_debounce(), Duration::from_millis(60));
        assert_eq!(config.filter_debounce(), Duration::from_millis(80));
        assert_eq!(config.submission_delay(), Duration::from_millis(900));
        assert!(!config.high_contrast());
    }

    #[test]
    fn test_configured_data_dir_wins() {
        let config = IntakeConfig {
            data_dir: Some(PathBuf::from("/tmp/intake")),
            ..Default::default()
        };
        assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/intake")));
    }

    #[test]
    fn test_partial_serialization() {
        let config = IntakeConfig {
            storage_key: Some("clinic-a".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: IntakeConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.storage_key(), "clinic-a");
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: IntakeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, IntakeConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown fields are ignored
        let json = r#"{"submission_delay_ms": 10, "theme": "dark"}"#;
        let parsed: IntakeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.submission_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_load_returns_ok_without_file() {
        assert!(IntakeConfig::load().is_ok());
    }
}
