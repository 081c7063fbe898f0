use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Mood chips offered on the explore screen, after the implicit "All".
    #[serde(default = "default_moods")]
    pub moods: Vec<String>,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Minimum horizontal mouse drag, in columns, that counts as a swipe.
    #[serde(default = "default_swipe_threshold_cols")]
    pub swipe_threshold_cols: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound on the quit-time session report. The report is dropped
    /// if the backend has not answered by then.
    #[serde(default = "default_unload_grace_ms")]
    pub unload_grace_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory that receives `podwave_export.json`.
    #[serde(default = "platform::default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            moods: default_moods(),
            search_debounce_ms: default_search_debounce_ms(),
            swipe_threshold_cols: default_swipe_threshold_cols(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unload_grace_ms: default_unload_grace_ms(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            export_dir: platform::default_export_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5090".to_string()
}

fn default_moods() -> Vec<String> {
    vec!["Focus".to_string(), "Build".to_string(), "Calm".to_string()]
}

fn default_search_debounce_ms() -> u64 {
    250
}

fn default_swipe_threshold_cols() -> u16 {
    8
}

fn default_unload_grace_ms() -> u64 {
    500
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5090");
        assert_eq!(config.ui.moods, vec!["Focus", "Build", "Calm"]);
        assert_eq!(config.ui.search_debounce_ms, 250);
        assert_eq!(config.ui.swipe_threshold_cols, 8);
        assert_eq!(config.session.unload_grace_ms, 500);
        assert!(Config::config_path().ends_with("podwave/config.toml"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://podwave.local:8080"

            [ui]
            moods = ["Calma"]
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://podwave.local:8080");
        assert_eq!(config.ui.moods, vec!["Calma"]);
        assert_eq!(config.ui.search_debounce_ms, 250);
        assert_eq!(config.session.unload_grace_ms, 500);
    }
}
