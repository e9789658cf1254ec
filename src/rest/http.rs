//! rest::http
//!
//! HTTP requester built on reqwest.
//!
//! # Design
//!
//! [`HttpRequester`] turns a [`CompiledRoute`] into one HTTPS request
//! against the configured API base and returns whatever came back as a
//! [`RawResponse`]. It does not interpret status codes; classification is
//! the deferred operation's job.
//!
//! # Authentication
//!
//! Client accounts send the raw token in `Authorization`; bot accounts send
//! `Bot <token>`. The token is never logged and is redacted from `Debug`.
//!
//! # Rate Limiting
//!
//! A 429 is returned like any other response, with its `Retry-After`
//! header preserved. Waiting and retrying is the caller's responsibility.
//!
//! # Example
//!
//! ```ignore
//! use cordkit::core::config::Config;
//! use cordkit::rest::http::HttpRequester;
//!
//! let config = Config::load(None)?.config;
//! let requester = HttpRequester::new("token", &config)?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;

use super::requester::Requester;
use super::response::{RawResponse, ResponseBody, TransportError};
use super::route::{CompiledRoute, Method};
use crate::core::config::Config;
use crate::session::AccountType;

/// Requester that talks to the remote API over HTTP.
pub struct HttpRequester {
    /// HTTP client (carries the timeout and User-Agent)
    client: Client,
    /// Account token
    token: String,
    /// How the token is presented
    account_type: AccountType,
    /// API base URL without trailing slash
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for HttpRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequester")
            .field("account_type", &self.account_type)
            .field("api_base", &self.api_base)
            .field("has_token", &!self.token.is_empty())
            .finish()
    }
}

impl HttpRequester {
    /// Create a requester from a token and the session configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Network` if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.into(),
            account_type: config.account_type(),
            api_base: config.api_base().to_string(),
        })
    }

    /// The API base URL requests are sent to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the absolute URL for a route.
    fn url(&self, route: &CompiledRoute) -> String {
        format!("{}/{}", self.api_base, route.path())
    }

    /// Build the per-request headers.
    fn headers(&self) -> Result<HeaderMap, TransportError> {
        let authorization = match self.account_type {
            AccountType::Bot => format!("Bot {}", self.token),
            AccountType::Client => self.token.clone(),
        };

        let mut value = HeaderValue::from_str(&authorization)
            .map_err(|_| TransportError::Network("token contains invalid header characters".into()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn map_send_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Requester for HttpRequester {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn execute(
        &self,
        route: &CompiledRoute,
        payload: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self
            .client
            .request(Self::method(route.method()), self.url(route))
            .headers(self.headers()?);

        if !route.query().is_empty() {
            request = request.query(route.query());
        }
        if let Some(body) = payload {
            request = request.json(body);
        }

        let response = request.send().await.map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response.bytes().await.map_err(Self::map_send_error)?;

        tracing::debug!(route = %route, status, "request completed");

        let mut raw = RawResponse::new(status, ResponseBody::from_bytes(&bytes));
        for (name, value) in headers {
            raw = raw.with_header(name, value);
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ClientConfig;
    use crate::rest::route::{applications, webhooks};

    fn config(account_type: &str) -> Config {
        Config::from_client(ClientConfig {
            api_base: Some("https://api.example.test/v6/".to_string()),
            account_type: Some(account_type.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn new_uses_config() {
        let requester = HttpRequester::new("token", &config("client")).unwrap();
        assert_eq!(requester.name(), "http");
        assert_eq!(requester.api_base(), "https://api.example.test/v6");
    }

    #[test]
    fn url_format() {
        let requester = HttpRequester::new("token", &config("client")).unwrap();
        assert_eq!(
            requester.url(&applications::GET_APPLICATION.compile(["42"])),
            "https://api.example.test/v6/oauth2/applications/42"
        );
    }

    #[test]
    fn client_token_sent_raw() {
        let requester = HttpRequester::new("abc", &config("client")).unwrap();
        let headers = requester.headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "abc");
    }

    #[test]
    fn bot_token_prefixed() {
        let requester = HttpRequester::new("abc", &config("bot")).unwrap();
        let headers = requester.headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bot abc");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn invalid_token_is_transport_error() {
        let requester = HttpRequester::new("bad\ntoken", &config("client")).unwrap();
        assert!(matches!(
            requester.headers(),
            Err(TransportError::Network(_))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let requester = HttpRequester::new("secret_token_abc123", &config("bot")).unwrap();
        let debug_output = format!("{:?}", requester);
        assert!(!debug_output.contains("secret_token_abc123"));
        assert!(debug_output.contains("has_token"));
    }

    #[test]
    fn method_mapping() {
        assert_eq!(HttpRequester::method(Method::Get), reqwest::Method::GET);
        assert_eq!(
            HttpRequester::method(webhooks::DELETE_WEBHOOK.method()),
            reqwest::Method::DELETE
        );
        assert_eq!(
            HttpRequester::method(webhooks::MODIFY_WEBHOOK.method()),
            reqwest::Method::PATCH
        );
    }
}
