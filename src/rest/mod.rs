//! rest
//!
//! Deferred requests against the remote REST API.
//!
//! # Architecture
//!
//! Entity methods never perform I/O directly. They return a
//! [`RestAction`] that describes one request; the caller decides when to
//! queue it and how to receive the outcome. Execution goes through the
//! session's [`Requester`], so tests swap the network for
//! [`MockRequester`](mock::MockRequester) without touching entity code.
//!
//! # Modules
//!
//! - [`route`]: Route templates and the route table
//! - `response`: Raw responses and transport errors
//! - `action`: The deferred operation and its completion sink
//! - `requester`: The `Requester` trait
//! - [`http`]: reqwest implementation
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use cordkit::rest::ActionError;
//!
//! match webhook.delete().complete().await {
//!     Ok(()) => println!("deleted"),
//!     Err(e) if e.is_not_found() => println!("already gone"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod action;
pub mod http;
pub mod mock;
mod requester;
mod response;
pub mod route;

pub use action::{ActionError, Completion, PendingAction, RestAction};
pub use requester::Requester;
pub use response::{RawResponse, ResponseBody, TransportError};
