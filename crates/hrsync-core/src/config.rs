use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HrError, HrResult};

/// Top-level client configuration (loaded from hrsync.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HrSyncConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL including the `/api` prefix
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Quiet period before search input is committed (default: 500)
    pub search_debounce_ms: u64,
    /// Delay between a finished sync execution and the follow-up check (default: 1000)
    pub recheck_delay_ms: u64,
    /// TUI input poll interval
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// EnvFilter directive (default: info); RUST_LOG takes precedence
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
    /// Log file for the TUI, which cannot write to the terminal
    pub file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_secs: 30,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            recheck_delay_ms: 1000,
            tick_ms: 250,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
            file: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn recheck_delay(&self) -> Duration {
        Duration::from_millis(self.recheck_delay_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

impl HrSyncConfig {
    /// Load a config file. `None` when it does not exist; the caller decides
    /// whether to fall back to defaults and reports it once logging is up.
    pub fn load(path: &Path) -> HrResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config: HrSyncConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(Some(config))
    }

    pub fn validate(&self) -> HrResult<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(HrError::Config(format!(
                "api.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if !matches!(self.log.format.as_str(), "json" | "text") {
            return Err(HrError::Config(format!(
                "log.format must be \"json\" or \"text\", got {:?}",
                self.log.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[api]
base_url = "https://hr.example.com/api"
timeout_secs = 5

[ui]
search_debounce_ms = 250
recheck_delay_ms = 2000
tick_ms = 100

[log]
level = "debug"
format = "json"
file = "/tmp/hrsync.log"
"#;
        let config: HrSyncConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api.base_url, "https://hr.example.com/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.ui.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.ui.recheck_delay(), Duration::from_millis(2000));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file, Some(PathBuf::from("/tmp/hrsync.log")));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_defaults() {
        let config: HrSyncConfig = toml::from_str("").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.search_debounce_ms, 500);
        assert_eq!(config.ui.recheck_delay_ms, 1000);
        assert_eq!(config.log.format, "text");
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[ui]
recheck_delay_ms = 0
"#;
        let config: HrSyncConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.ui.recheck_delay(), Duration::ZERO);
        // Defaults
        assert_eq!(config.ui.search_debounce_ms, 500);
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = HrSyncConfig::default();
        config.api.base_url = "localhost:8000".into();
        assert!(matches!(config.validate(), Err(HrError::Config(_))));

        let mut config = HrSyncConfig::default();
        config.log.format = "yaml".into();
        assert!(matches!(config.validate(), Err(HrError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = HrSyncConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
        assert_eq!(loaded.unwrap_or_default().ui.tick_ms, 250);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://10.0.0.5:8000/api\"").unwrap();
        let config = HrSyncConfig::load(file.path()).unwrap().unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = HrSyncConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: HrSyncConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.api.base_url, parsed.api.base_url);
        assert_eq!(config.ui.recheck_delay_ms, parsed.ui.recheck_delay_ms);
    }
}
