//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Client Config
//!
//! Located at (in order of precedence):
//! 1. An explicit path passed to [`Config::load`](super::Config::load)
//! 2. `$CORDKIT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/cordkit/config.toml`
//! 4. `~/.cordkit/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad base URL or a
//! zero timeout is reported at load time rather than on the first request.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Client configuration.
///
/// The account token is deliberately not part of this schema; it is passed
/// to the session builder and never read from or written to disk here.
///
/// # Example
///
/// ```toml
/// api_base = "https://discord.com/api/v6"
/// account_type = "client"
/// request_timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// REST API base URL (no trailing slash needed)
    pub api_base: Option<String>,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,

    /// Account type ("client" or "bot")
    pub account_type: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Valid account types.
    pub const VALID_ACCOUNT_TYPES: &'static [&'static str] = &["client", "bot"];

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            validate_base_url("api_base", base)?;
        }

        if let Some(agent) = &self.user_agent {
            if agent.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "user_agent cannot be empty".to_string(),
                ));
            }
        }

        if let Some(kind) = &self.account_type {
            if !Self::VALID_ACCOUNT_TYPES.contains(&kind.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid account_type '{}', must be one of: {}",
                    kind,
                    Self::VALID_ACCOUNT_TYPES.join(", ")
                )));
            }
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue(format!("{field} cannot be empty")));
    }
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(ConfigError::InvalidValue(format!(
            "{field} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}
