//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A session is configured from a single TOML file. Every value is optional;
//! the accessor methods on [`Config`] apply the defaults.
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path, if given
//! 2. `$CORDKIT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/cordkit/config.toml`
//! 4. `~/.cordkit/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use cordkit::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("API base: {}", config.api_base());
//! println!("Timeout: {:?}", config.request_timeout());
//! ```

pub mod schema;

pub use schema::ClientConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::session::AccountType;

/// Default REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v6";

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = concat!("cordkit/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CORDKIT_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw client configuration
    pub client: ClientConfig,
    /// Path the configuration was loaded from (if any)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Build a config directly from a schema value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the values fail validation.
    pub fn from_client(client: ClientConfig) -> Result<Self, ConfigError> {
        client.validate()?;
        Ok(Self {
            client,
            loaded_from: None,
        })
    }

    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. The environment and home-directory
    /// locations are optional; when none exists the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_file(path);
        }

        // 1. Check $CORDKIT_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/cordkit/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("cordkit/config.toml");
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        // 3. Check ~/.cordkit/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".cordkit/config.toml");
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
        })
    }

    fn load_file(path: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let client = Self::read_client_config(path)?;
        client.validate()?;
        tracing::debug!(path = %path.display(), "loaded client config");

        Ok(ConfigLoadResult {
            config: Config {
                client,
                loaded_from: Some(path.to_path_buf()),
            },
        })
    }

    /// Read and parse a client config file.
    fn read_client_config(path: &Path) -> Result<ClientConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// REST API base URL without a trailing slash.
    ///
    /// Defaults to [`DEFAULT_API_BASE`].
    pub fn api_base(&self) -> &str {
        self.client
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// User-Agent header value.
    pub fn user_agent(&self) -> &str {
        self.client
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Account type.
    ///
    /// Defaults to [`AccountType::Client`].
    pub fn account_type(&self) -> AccountType {
        match self.client.account_type.as_deref() {
            Some("bot") => AccountType::Bot,
            _ => AccountType::Client,
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.client
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_applied() {
        let config = Config::default();

        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert!(config.user_agent().starts_with("cordkit/"));
        assert_eq!(config.account_type(), AccountType::Client);
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn trailing_slash_trimmed() {
        let config = Config::from_client(ClientConfig {
            api_base: Some("https://example.test/api/".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.api_base(), "https://example.test/api");
    }

    #[test]
    fn load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            api_base = "http://127.0.0.1:8080"
            account_type = "bot"
            request_timeout_secs = 3
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&config_path)).unwrap();
        let config = result.config;

        assert_eq!(config.api_base(), "http://127.0.0.1:8080");
        assert_eq!(config.account_type(), AccountType::Bot);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");

        let result = Config::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn parse_error_reports_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "api_base = [").unwrap();

        let err = Config::load(Some(&config_path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn invalid_value_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "request_timeout_secs = 0").unwrap();

        let result = Config::load(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn load_from_env() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("env.toml");
        fs::write(&config_path, "user_agent = \"from-env\"").unwrap();

        std::env::set_var(CONFIG_ENV, config_path.to_str().unwrap());
        let result = Config::load(None);
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(result.unwrap().config.user_agent(), "from-env");
    }

    #[test]
    fn from_client_validates() {
        let result = Config::from_client(ClientConfig {
            account_type: Some("robot".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
