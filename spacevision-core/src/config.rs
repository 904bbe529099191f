use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::module::nasa::{NasaEndpoints, RetryPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_images_base")]
    pub images_base: String,

    /// Root directory for persisted state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Subdirectory of `data_dir` holding this app's keys
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_key() -> String {
    "DEMO_KEY".to_string()
}

fn default_api_base() -> String {
    "https://api.nasa.gov".to_string()
}

fn default_images_base() -> String {
    "https://images-api.nasa.gov".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_namespace() -> String {
    "spacevision".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("SpaceVision/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_base: default_api_base(),
            images_base: default_images_base(),
            data_dir: default_data_dir(),
            namespace: default_namespace(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn endpoints(&self) -> NasaEndpoints {
        NasaEndpoints::new(&self.api_base, &self.images_base, &self.api_key)
    }

    /// Directory holding the persisted key-value slots
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join(&self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("api_key = \"abc\"\nmax_retries = 5\n").unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_backoff_ms, 300);
        assert_eq!(config.namespace, "spacevision");
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api_key, "DEMO_KEY");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "max_retries = \"many\"").unwrap();
        assert!(AppConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = AppConfig::default();
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(300));
        assert_eq!(
            config.storage_dir(),
            PathBuf::from("data").join("spacevision")
        );
    }
}
