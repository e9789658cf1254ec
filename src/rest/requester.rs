//! rest::requester
//!
//! The transport seam between deferred operations and the network.
//!
//! # Design
//!
//! [`Requester`] is async because execution involves network I/O. It is the
//! only place a request leaves the process. Retry, backoff and rate-limit
//! admission belong to the implementation behind this trait; a
//! [`RestAction`](super::RestAction) never retries on its own.
//!
//! Implementations:
//! - [`HttpRequester`](super::http::HttpRequester): reqwest over HTTPS
//! - [`MockRequester`](super::mock::MockRequester): canned responses for tests
//!
//! # Example
//!
//! ```ignore
//! use cordkit::rest::{Requester, route::applications};
//!
//! async fn check_status(requester: &dyn Requester) {
//!     let route = applications::GET_APPLICATIONS.compile([]);
//!     match requester.execute(&route, None).await {
//!         Ok(response) => println!("status {}", response.status()),
//!         Err(e) => println!("transport failure: {e}"),
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use super::response::{RawResponse, TransportError};
use super::route::CompiledRoute;

/// Executes compiled routes against the remote API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one requester is shared by every
/// in-flight operation of a session.
///
/// # Contract
///
/// - Any HTTP response, whatever its status, is `Ok(RawResponse)`.
/// - `Err(TransportError)` means no response was obtained at all.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Short implementation name for logs (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Perform one request.
    async fn execute(
        &self,
        route: &CompiledRoute,
        payload: Option<&Value>,
    ) -> Result<RawResponse, TransportError>;
}
