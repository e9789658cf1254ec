//! rest::response
//!
//! Raw transport responses and transport failures.
//!
//! A [`RawResponse`] is what the executor hands back for one request: the
//! status, the decoded body (JSON when possible, raw text otherwise) and the
//! headers a caller might want for diagnostics. It is classified "ok" iff
//! the status is in the 2xx class.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::builder::BuildError;

/// Failure below the HTTP layer: the request produced no response.
///
/// This layer does not interpret the cause; it only forwards it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, TLS or protocol error.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body (e.g. 204 No Content).
    Empty,
    /// A JSON document.
    Json(Value),
    /// A body that was not valid JSON.
    Text(String),
}

impl ResponseBody {
    /// Decode raw body bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ResponseBody::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// One raw response from the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    status: u16,
    body: ResponseBody,
    headers: BTreeMap<String, String>,
}

impl RawResponse {
    /// Build a response from its parts.
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            body,
            headers: BTreeMap::new(),
        }
    }

    /// Shorthand for a JSON response.
    pub fn json(status: u16, value: Value) -> Self {
        Self::new(status, ResponseBody::Json(value))
    }

    /// Shorthand for a bodyless response.
    pub fn empty(status: u16) -> Self {
        Self::new(status, ResponseBody::Empty)
    }

    /// Attach a header (names are stored lower-case).
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Whether the status is in the 2xx class.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Decoded body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The body as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::WrongShape` if the body is not a JSON object.
    pub fn object(&self) -> Result<&serde_json::Map<String, Value>, BuildError> {
        match &self.body {
            ResponseBody::Json(Value::Object(map)) => Ok(map),
            _ => Err(BuildError::WrongShape {
                expected: "object",
                found: self.shape(),
            }),
        }
    }

    /// The body as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::WrongShape` if the body is not a JSON array.
    pub fn array(&self) -> Result<&[Value], BuildError> {
        match &self.body {
            ResponseBody::Json(Value::Array(items)) => Ok(items),
            _ => Err(BuildError::WrongShape {
                expected: "array",
                found: self.shape(),
            }),
        }
    }

    /// Consume the response and take the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::WrongShape` if the body is empty or not JSON.
    pub fn into_json(self) -> Result<Value, BuildError> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty => Err(BuildError::WrongShape {
                expected: "json",
                found: "empty",
            }),
            ResponseBody::Text(_) => Err(BuildError::WrongShape {
                expected: "json",
                found: "text",
            }),
        }
    }

    /// Short message extracted from an error body, if any.
    ///
    /// The remote API reports errors as `{"code": .., "message": ".."}`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Json(Value::Object(map)) => map.get("message").and_then(Value::as_str),
            ResponseBody::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn shape(&self) -> &'static str {
        match &self.body {
            ResponseBody::Empty => "empty",
            ResponseBody::Text(_) => "text",
            ResponseBody::Json(Value::Object(_)) => "object",
            ResponseBody::Json(Value::Array(_)) => "array",
            ResponseBody::Json(Value::Null) => "null",
            ResponseBody::Json(_) => "scalar",
        }
    }
}
