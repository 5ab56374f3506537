//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KKB_CURRENCY=₱                                                     │
//! │     KKB_SHARE_BASE_URL=https://split.example.com/                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, otherwise                                         │
//! │     ~/.config/kkb/kkb.toml (Linux)                                     │
//! │     ~/Library/Application Support/app.kkb.kkb/kkb.toml (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     currency "$", links under https://kkb.app/                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kkb.toml
//! [display]
//! currency_symbol = "₱"   # symbol for new bills (`kkb template`)
//!
//! [share]
//! base_url = "https://kkb.app/"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use kkb_core::DEFAULT_CURRENCY;

/// Environment variable overriding `display.currency_symbol`.
pub const ENV_CURRENCY: &str = "KKB_CURRENCY";

/// Environment variable overriding `share.base_url`.
pub const ENV_SHARE_BASE_URL: &str = "KKB_SHARE_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://kkb.app/";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// How bills are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Currency symbol given to new bills.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Where share links point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSettings {
    /// App URL the `data` parameter is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            base_url: default_base_url(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub share: ShareSettings,
}

impl CliConfig {
    /// Loads configuration from file and environment.
    ///
    /// An explicit `config_path` must exist; the platform default path is
    /// simply skipped when absent.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// [`CliConfig::load`] with a custom environment lookup.
    pub fn load_with_env<F>(config_path: Option<&Path>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.display.currency_symbol.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "display.currency_symbol".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        self.base_url()?;
        Ok(())
    }

    /// The parsed share base URL.
    pub fn base_url(&self) -> ConfigResult<Url> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: "share.base_url".to_string(),
            reason,
        };

        let url = Url::parse(&self.share.base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!(
                "scheme must be http or https, got '{}'",
                other
            ))),
        }
    }

    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(symbol) = env(ENV_CURRENCY) {
            debug!(currency = %symbol, "Overriding currency symbol from environment");
            self.display.currency_symbol = symbol;
        }

        if let Some(url) = env(ENV_SHARE_BASE_URL) {
            debug!(url = %url, "Overriding share base URL from environment");
            self.share.base_url = url;
        }
    }

    /// Platform config path of `kkb.toml`.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("app", "kkb", "kkb").map(|dirs| dirs.config_dir().join("kkb.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.share.base_url, "https://kkb.app/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [display]
            currency_symbol = "₱"

            [share]
            base_url = "https://split.example.com/bill"
            "#,
        );

        let config = CliConfig::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.display.currency_symbol, "₱");
        assert_eq!(config.base_url().unwrap().path(), "/bill");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[display]\ncurrency_symbol = \"€\"\n");
        let config = CliConfig::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.display.currency_symbol, "€");
        assert_eq!(config.share, ShareSettings::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[display]\ncurrency_symbol = \"€\"\n");
        let env = |key: &str| match key {
            ENV_CURRENCY => Some("£".to_string()),
            ENV_SHARE_BASE_URL => Some("http://localhost:5173/".to_string()),
            _ => None,
        };

        let config = CliConfig::load_with_env(Some(file.path()), env).unwrap();
        assert_eq!(config.display.currency_symbol, "£");
        assert_eq!(config.share.base_url, "http://localhost:5173/");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            CliConfig::load_with_env(Some(&missing), no_env),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_error() {
        let file = write_config("[display\n");
        assert!(matches!(
            CliConfig::load_with_env(Some(file.path()), no_env),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = CliConfig::default();
        config.share.base_url = "ftp://kkb.app/".to_string();
        assert!(config.validate().is_err());

        config.share.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.display.currency_symbol = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = CliConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[display]"));
        assert!(text.contains("[share]"));
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
