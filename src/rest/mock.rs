//! rest::mock
//!
//! Mock requester for deterministic testing.
//!
//! # Design
//!
//! [`MockRequester`] answers requests from canned responses keyed by method
//! and path, records every request it receives, and can be told to fail at
//! the transport layer. Requests with no canned response get a 404 shaped
//! like the remote API's own.
//!
//! When several responses are queued for one route they are returned in
//! order; the last one then repeats.
//!
//! # Example
//!
//! ```
//! use cordkit::rest::mock::MockRequester;
//! use cordkit::rest::route::{applications, Method};
//! use cordkit::rest::{RawResponse, Requester};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mock = MockRequester::new();
//! mock.respond(Method::Get, "oauth2/applications", RawResponse::json(200, json!([])));
//!
//! let route = applications::GET_APPLICATIONS.compile([]);
//! let response = mock.execute(&route, None).await.unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(mock.request_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use super::requester::Requester;
use super::response::{RawResponse, TransportError};
use super::route::{CompiledRoute, Method};

/// Mock requester for testing.
///
/// Clones share state, so a test can keep one handle while the session owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockRequester {
    inner: Arc<Mutex<MockRequesterInner>>,
}

#[derive(Debug, Default)]
struct MockRequesterInner {
    /// Canned responses by (method, path).
    responses: HashMap<(Method, String), VecDeque<RawResponse>>,
    /// Transport failure to return for every request.
    fail_with: Option<TransportError>,
    /// Recorded requests for verification.
    requests: Vec<RecordedRequest>,
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Option<Value>,
}

impl MockRequester {
    /// Create a mock with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` + `path`.
    pub fn respond(&self, method: Method, path: impl Into<String>, response: RawResponse) {
        let mut inner = self.inner.lock();
        inner
            .responses
            .entry((method, path.into()))
            .or_default()
            .push_back(response);
    }

    /// Fail every request with the given transport error.
    ///
    /// ```
    /// use cordkit::rest::mock::MockRequester;
    /// use cordkit::rest::TransportError;
    ///
    /// let mock = MockRequester::new().fail_with(TransportError::Timeout);
    /// ```
    pub fn fail_with(self, error: TransportError) -> Self {
        self.inner.lock().fail_with = Some(error);
        self
    }

    /// Clear the transport failure.
    pub fn clear_failure(&self) {
        self.inner.lock().fail_with = None;
    }

    /// All recorded requests, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().requests.clone()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.inner.lock().requests.len()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.inner.lock().requests.clear();
    }

    fn not_found() -> RawResponse {
        RawResponse::json(404, json!({"code": 0, "message": "404: Not Found"}))
    }
}

#[async_trait]
impl Requester for MockRequester {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(
        &self,
        route: &CompiledRoute,
        payload: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        let mut inner = self.inner.lock();
        inner.requests.push(RecordedRequest {
            method: route.method(),
            path: route.path().to_string(),
            query: route.query().to_vec(),
            payload: payload.cloned(),
        });

        if let Some(error) = &inner.fail_with {
            return Err(error.clone());
        }

        let key = (route.method(), route.path().to_string());
        let response = match inner.responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(Self::not_found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::route::{applications, channels, webhooks};

    #[tokio::test]
    async fn unknown_route_is_404() {
        let mock = MockRequester::new();
        let route = channels::GET_WEBHOOKS.compile(["1"]);

        let response = mock.execute(&route, None).await.unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.error_message(), Some("404: Not Found"));
    }

    #[tokio::test]
    async fn queued_responses_in_order_then_repeat() {
        let mock = MockRequester::new();
        mock.respond(Method::Get, "oauth2/applications", RawResponse::empty(500));
        mock.respond(Method::Get, "oauth2/applications", RawResponse::json(200, json!([])));
        let route = applications::GET_APPLICATIONS.compile([]);

        let statuses: Vec<u16> = [
            mock.execute(&route, None).await.unwrap().status(),
            mock.execute(&route, None).await.unwrap().status(),
            mock.execute(&route, None).await.unwrap().status(),
        ]
        .to_vec();

        assert_eq!(statuses, vec![500, 200, 200]);
    }

    #[tokio::test]
    async fn method_is_part_of_key() {
        let mock = MockRequester::new();
        mock.respond(Method::Get, "webhooks/1", RawResponse::json(200, json!({})));

        let delete = webhooks::DELETE_WEBHOOK.compile(["1"]);
        let response = mock.execute(&delete, None).await.unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockRequester::new();
        let route = webhooks::MODIFY_WEBHOOK.compile(["7"]);
        let payload = json!({"name": "renamed"});

        mock.execute(&route, Some(&payload)).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Patch);
        assert_eq!(requests[0].path, "webhooks/7");
        assert_eq!(requests[0].payload, Some(payload));

        mock.clear_requests();
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn fail_with_transport_error() {
        let mock = MockRequester::new().fail_with(TransportError::Network("refused".into()));
        let route = applications::GET_APPLICATIONS.compile([]);

        let result = mock.execute(&route, None).await;
        assert_eq!(result, Err(TransportError::Network("refused".into())));
        assert_eq!(mock.request_count(), 1);

        mock.clear_failure();
        assert!(mock.execute(&route, None).await.is_ok());
    }

    #[test]
    fn clones_share_state() {
        let mock = MockRequester::new();
        let other = mock.clone();
        other.respond(Method::Get, "x", RawResponse::empty(204));
        assert_eq!(mock.inner.lock().responses.len(), 1);
    }
}
