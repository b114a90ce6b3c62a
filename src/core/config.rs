use crate::core::expense::DEFAULT_CATEGORIES;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://v6.exchangerate-api.com";
pub const API_KEY_ENV: &str = "EXCHANGE_RATE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        ExchangeRateProviderConfig {
            base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchange_rate: ExchangeRateProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    pub data_path: Option<String>,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            categories: default_categories(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no config file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xpt", "xpt")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Location of the expenses file.
    pub fn expenses_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "xpt", "xpt")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("expenses.json"))
    }

    /// Applies `EXCHANGE_RATE_API_KEY` from the environment, which wins over
    /// the key in the config file.
    pub fn apply_env(&mut self) {
        self.override_api_key(std::env::var(API_KEY_ENV).ok());
    }

    fn override_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            debug!("Using exchange rate API key from {API_KEY_ENV}");
            self.providers.exchange_rate.api_key = Some(key);
        }
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
data_path: "/tmp/xpt/expenses.json"
categories:
  - Groceries
  - Rent
providers:
  exchange_rate:
    base_url: "http://example.com/rates"
    api_key: "secret"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/xpt/expenses.json"));
        assert_eq!(config.categories, vec!["Groceries", "Rent"]);
        assert_eq!(
            config.providers.exchange_rate.base_url,
            "http://example.com/rates"
        );
        assert_eq!(
            config.providers.exchange_rate.api_key.as_deref(),
            Some("secret")
        );
        assert_eq!(
            config.expenses_path().unwrap(),
            PathBuf::from("/tmp/xpt/expenses.json")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~").unwrap();
        assert_eq!(config.categories, vec!["Food", "Transport", "Entertainment"]);
        assert_eq!(
            config.providers.exchange_rate.base_url,
            DEFAULT_EXCHANGE_RATE_URL
        );
        assert!(config.providers.exchange_rate.api_key.is_none());
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_api_key_override() {
        let mut config = AppConfig::default();
        config.providers.exchange_rate.api_key = Some("from-file".to_string());

        config.override_api_key(None);
        assert_eq!(config.providers.exchange_rate.api_key.as_deref(), Some("from-file"));

        config.override_api_key(Some("  ".to_string()));
        assert_eq!(config.providers.exchange_rate.api_key.as_deref(), Some("from-file"));

        config.override_api_key(Some("from-env".to_string()));
        assert_eq!(config.providers.exchange_rate.api_key.as_deref(), Some("from-env"));
    }
}
