//! rest::action
//!
//! The deferred operation primitive.
//!
//! # Design
//!
//! A [`RestAction`] couples a compiled route (plus optional JSON payload)
//! with a response handler. Nothing happens until it is queued; queueing
//! hands it to the session's [`Requester`](super::Requester) on the async
//! runtime and returns immediately.
//!
//! Every queued action finishes exactly once, through a [`Completion`]:
//!
//! - a transport failure fails with [`ActionError::Transport`]
//! - a non-2xx response fails with [`ActionError::Rejected`], carrying the
//!   raw response unmodified
//! - a 2xx response runs the handler; its `Ok` value is the success value
//!   and its `Err` (or a panic inside it) is the failure
//!
//! `execute` and both `Completion` methods take `self` by value, so a
//! second invocation does not type-check.
//!
//! Actions never retry. A failed action leaves the caller free to build and
//! queue a fresh one.
//!
//! An action built with [`RestAction::ready`] already holds its success
//! value. Queueing it finishes the completion immediately and sends nothing.
//!
//! # Example
//!
//! ```ignore
//! let apps = session.as_client()?.applications().complete().await?;
//! for app in apps {
//!     println!("{app}");
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;

use super::response::{RawResponse, TransportError};
use super::route::CompiledRoute;
use crate::builder::BuildError;
use crate::session::{Session, SessionRef};

/// Why a deferred operation failed.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// No response was obtained.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The remote API answered with a non-2xx status.
    #[error("request rejected with HTTP {}", .0.status())]
    Rejected(RawResponse),

    /// A 2xx response could not be turned into the expected value.
    #[error("malformed response: {0}")]
    Malformed(#[from] BuildError),

    /// The session was dropped before the response could be handled.
    #[error("session closed")]
    SessionClosed,

    /// The response handler panicked.
    #[error("response handler panicked: {0}")]
    HandlerPanicked(String),

    /// Queued outside an async runtime and the session has no runtime handle.
    #[error("no async runtime available to execute the request")]
    NoRuntime,

    /// The operation was dropped before it completed.
    #[error("operation dropped before completion")]
    Dropped,
}

impl ActionError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        self.response().map(RawResponse::status)
    }

    /// The raw response of a rejected request.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            ActionError::Rejected(response) => Some(response),
            _ => None,
        }
    }

    /// True if the remote API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

type SuccessFn<T> = Box<dyn FnOnce(T) + Send>;
type FailureFn = Box<dyn FnOnce(ActionError) + Send>;
type Handler<T> = Box<dyn FnOnce(&Session, RawResponse) -> Result<T, ActionError> + Send>;

enum Plan<T> {
    Request {
        payload: Option<Value>,
        handler: Handler<T>,
    },
    Ready(T),
}

enum Sink<T> {
    Callbacks {
        on_success: SuccessFn<T>,
        on_failure: FailureFn,
    },
    Channel(oneshot::Sender<Result<T, ActionError>>),
}

/// The two-outcome sink a deferred operation finishes through.
///
/// Consumed by whichever of [`success`](Self::success) or
/// [`failure`](Self::failure) is called, so it fires at most once. Dropping
/// it unfired makes a waiting [`PendingAction`] resolve to
/// [`ActionError::Dropped`].
pub struct Completion<T> {
    sink: Sink<T>,
}

impl<T: Send + 'static> Completion<T> {
    /// A completion that invokes one of two callbacks.
    pub fn new(
        on_success: impl FnOnce(T) + Send + 'static,
        on_failure: impl FnOnce(ActionError) + Send + 'static,
    ) -> Self {
        Self {
            sink: Sink::Callbacks {
                on_success: Box::new(on_success),
                on_failure: Box::new(on_failure),
            },
        }
    }

    /// A completion paired with a future that resolves to its outcome.
    pub fn channel() -> (Self, PendingAction<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sink: Sink::Channel(tx),
            },
            PendingAction { rx },
        )
    }

    /// Finish with a value.
    pub fn success(self, value: T) {
        self.finish(Ok(value));
    }

    /// Finish with an error.
    pub fn failure(self, error: ActionError) {
        self.finish(Err(error));
    }

    /// Finish with whichever outcome `result` holds.
    pub fn finish(self, result: Result<T, ActionError>) {
        match self.sink {
            Sink::Callbacks {
                on_success,
                on_failure,
            } => match result {
                Ok(value) => on_success(value),
                Err(error) => on_failure(error),
            },
            Sink::Channel(tx) => {
                // The receiver may already be gone; nobody is listening then.
                let _ = tx.send(result);
            }
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.sink {
            Sink::Callbacks { .. } => "callbacks",
            Sink::Channel(_) => "channel",
        };
        f.debug_struct("Completion").field("sink", &kind).finish()
    }
}

/// Future returned by [`RestAction::queue`].
///
/// Resolves once the operation completes. Dropping it does not cancel the
/// request.
#[derive(Debug)]
pub struct PendingAction<T> {
    rx: oneshot::Receiver<Result<T, ActionError>>,
}

impl<T> Future for PendingAction<T> {
    type Output = Result<T, ActionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ActionError::Dropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// A deferred request against the remote API.
///
/// Inert until [`queue`](Self::queue), [`queue_with`](Self::queue_with) or
/// [`complete`](Self::complete) is called.
#[must_use = "a RestAction does nothing until it is queued"]
pub struct RestAction<T> {
    session: SessionRef,
    route: CompiledRoute,
    plan: Plan<T>,
}

impl<T: Send + 'static> RestAction<T> {
    /// Build an action from a route, optional payload and response handler.
    ///
    /// The handler only ever sees 2xx responses.
    pub fn new(
        session: SessionRef,
        route: CompiledRoute,
        payload: Option<Value>,
        handler: impl FnOnce(&Session, RawResponse) -> Result<T, ActionError> + Send + 'static,
    ) -> Self {
        Self {
            session,
            route,
            plan: Plan::Request {
                payload,
                handler: Box::new(handler),
            },
        }
    }

    /// An action that succeeds with `value` without contacting the remote
    /// API. `route` is the route the equivalent request would have used.
    pub fn ready(session: SessionRef, route: CompiledRoute, value: T) -> Self {
        Self {
            session,
            route,
            plan: Plan::Ready(value),
        }
    }

    /// Whether this action resolves without sending a request.
    pub fn is_ready(&self) -> bool {
        matches!(self.plan, Plan::Ready(_))
    }

    /// The route this action targets.
    pub fn route(&self) -> &CompiledRoute {
        &self.route
    }

    /// The JSON payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match &self.plan {
            Plan::Request { payload, .. } => payload.as_ref(),
            Plan::Ready(_) => None,
        }
    }

    /// Transform the success value.
    pub fn map<U: Send + 'static>(
        self,
        f: impl FnOnce(T) -> U + Send + 'static,
    ) -> RestAction<U> {
        let plan = match self.plan {
            Plan::Request { payload, handler } => Plan::Request {
                payload,
                handler: Box::new(move |session, response| handler(session, response).map(f)),
            },
            Plan::Ready(value) => Plan::Ready(f(value)),
        };
        RestAction {
            session: self.session,
            route: self.route,
            plan,
        }
    }

    /// Classify a transport outcome and finish `completion` exactly once.
    ///
    /// This is what the runtime calls once the requester returns; it is
    /// public so an embedding transport can drive actions itself. A
    /// [`ready`](Self::ready) action ignores `outcome` and succeeds.
    pub fn execute(
        self,
        outcome: Result<RawResponse, TransportError>,
        completion: Completion<T>,
    ) {
        let template = self.route.template();
        let result = self.resolve(outcome);
        match &result {
            Ok(_) => tracing::debug!(route = template, "action succeeded"),
            Err(ActionError::Rejected(response)) => {
                tracing::debug!(route = template, status = response.status(), "action rejected")
            }
            Err(e) => tracing::warn!(route = template, error = %e, "action failed"),
        }
        completion.finish(result);
    }

    fn resolve(self, outcome: Result<RawResponse, TransportError>) -> Result<T, ActionError> {
        let handler = match self.plan {
            Plan::Request { handler, .. } => handler,
            Plan::Ready(value) => return Ok(value),
        };
        let response = outcome?;
        if !response.is_ok() {
            return Err(ActionError::Rejected(response));
        }

        let session = self.session.upgrade().ok_or(ActionError::SessionClosed)?;
        match panic::catch_unwind(AssertUnwindSafe(move || handler(&session, response))) {
            Ok(result) => result,
            Err(payload) => Err(ActionError::HandlerPanicked(panic_message(payload.as_ref()))),
        }
    }

    /// Submit for execution; the returned future resolves with the outcome.
    pub fn queue(self) -> PendingAction<T> {
        let (completion, pending) = Completion::channel();
        self.submit(completion);
        pending
    }

    /// Submit for execution, finishing through the given callbacks.
    pub fn queue_with(
        self,
        on_success: impl FnOnce(T) + Send + 'static,
        on_failure: impl FnOnce(ActionError) + Send + 'static,
    ) {
        self.submit(Completion::new(on_success, on_failure));
    }

    /// Submit and wait for the outcome.
    pub async fn complete(self) -> Result<T, ActionError> {
        self.queue().await
    }

    fn submit(self, completion: Completion<T>) {
        let template = self.route.template();
        let action = match self.into_ready() {
            Ok(value) => {
                tracing::debug!(route = template, "action resolved without a request");
                completion.success(value);
                return;
            }
            Err(action) => action,
        };
        match action.session.upgrade() {
            Some(session) => session.dispatch(action, completion),
            None => completion.failure(ActionError::SessionClosed),
        }
    }

    fn into_ready(self) -> Result<T, Self> {
        match self.plan {
            Plan::Ready(value) => Ok(value),
            plan => Err(Self {
                session: self.session,
                route: self.route,
                plan,
            }),
        }
    }
}

impl RestAction<()> {
    /// An action whose success carries no value.
    pub fn void(session: SessionRef, route: CompiledRoute, payload: Option<Value>) -> Self {
        Self::new(session, route, payload, |_, _| Ok(()))
    }
}

impl<T> fmt::Debug for RestAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestAction")
            .field("route", &self.route)
            .field(
                "has_payload",
                &matches!(self.plan, Plan::Request { payload: Some(_), .. }),
            )
            .field("ready", &matches!(self.plan, Plan::Ready(_)))
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
