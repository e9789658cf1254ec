//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Snowflake`] - Globally unique 64-bit entity identifier
//!
//! # Validation
//!
//! Identifiers arrive from the remote API as decimal strings. They are
//! parsed once at construction time, so an invalid id can never reach a
//! registry or a route.
//!
//! # Examples
//!
//! ```
//! use cordkit::core::types::Snowflake;
//!
//! let id = Snowflake::parse("123456789012345").unwrap();
//! assert_eq!(id.get(), 123456789012345);
//! assert_eq!(id.to_string(), "123456789012345");
//!
//! assert!(Snowflake::parse("-1").is_err());
//! assert!(Snowflake::parse("12ab").is_err());
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid snowflake: {0}")]
    InvalidSnowflake(String),
}

/// Milliseconds between the Unix epoch and the service epoch (2015-01-01T00:00:00Z).
pub const SERVICE_EPOCH_MS: u64 = 1_420_070_400_000;

/// An opaque, globally unique entity identifier.
///
/// Equality, ordering and hashing are purely numeric. Every entity kind in
/// the crate derives its own equality from this value alone.
///
/// On the wire a snowflake is a decimal string, and that is also how it
/// serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Snowflake(u64);

impl Snowflake {
    /// Wrap a raw numeric id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a snowflake from its decimal string form.
    ///
    /// Only ASCII digits are accepted. Signs, whitespace and values that do
    /// not fit in 64 bits are rejected.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSnowflake` describing the problem.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidSnowflake("id cannot be empty".into()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidSnowflake(format!(
                "'{s}' is not a decimal number"
            )));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidSnowflake(format!("'{s}' does not fit in 64 bits")))
    }

    /// The raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// When the entity carrying this id was created.
    ///
    /// The upper 42 bits hold milliseconds since [`SERVICE_EPOCH_MS`].
    ///
    /// ```
    /// use cordkit::core::types::Snowflake;
    ///
    /// let id = Snowflake::new(0);
    /// assert_eq!(id.creation_time().to_rfc3339(), "2015-01-01T00:00:00+00:00");
    /// ```
    pub fn creation_time(self) -> DateTime<Utc> {
        let millis = (self.0 >> 22) + SERVICE_EPOCH_MS;
        // (u64::MAX >> 22) + epoch stays far below i64::MAX, and chrono
        // accepts every millisecond value in that range.
        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<String> for Snowflake {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl TryFrom<&str> for Snowflake {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl std::str::FromStr for Snowflake {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Snowflake> for String {
    fn from(id: Snowflake) -> Self {
        id.0.to_string()
    }
}

impl std::fmt::Display for Snowflake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
