//! session
//!
//! The owning session: configuration, transport and registries.
//!
//! # Design
//!
//! A [`Session`] is a cheap clonable handle to shared state. It owns:
//!
//! - the [`Requester`] every deferred operation executes through,
//! - the session-wide registries (users, text channels, webhooks),
//! - the lazily created [`Client`] companion for client accounts.
//!
//! Entities and deferred operations hold a [`SessionRef`], a weak handle.
//! They never keep a session alive; once the last `Session` is dropped,
//! pending operations fail with [`ActionError::SessionClosed`].
//!
//! # Execution
//!
//! Queued operations run as tokio tasks. The runtime is the one given to
//! [`SessionBuilder::runtime`], or else whichever runtime the queueing code
//! runs in. Queueing with neither fails the operation with
//! [`ActionError::NoRuntime`].
//!
//! # Example
//!
//! ```ignore
//! use cordkit::core::config::Config;
//! use cordkit::session::Session;
//!
//! let config = Config::load(None)?.config;
//! let session = Session::builder(token).config(config).build()?;
//!
//! let client = session.as_client()?;
//! for friend in client.friends() {
//!     println!("{friend}");
//! }
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::runtime::Handle;

use crate::builder::EntityBuilder;
use crate::client::Client;
use crate::core::config::Config;
use crate::entities::{TextChannel, User, Webhook};
use crate::ingest::Ingestor;
use crate::lazy::LazyShared;
use crate::registry::Registry;
use crate::rest::http::HttpRequester;
use crate::rest::{ActionError, Completion, Requester, RestAction, TransportError};

/// How the session authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// A user account. Has groups, relationships and applications.
    Client,
    /// A bot account.
    Bot,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Client => write!(f, "client"),
            AccountType::Bot => write!(f, "bot"),
        }
    }
}

/// Errors from session construction and account-specific access.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token cannot be empty")]
    EmptyToken,

    #[error("operation requires a client account, but this session is a {0} account")]
    NotClientAccount(AccountType),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

struct SessionInner {
    config: Config,
    requester: Arc<dyn Requester>,
    runtime: Option<Handle>,
    users: Registry<User>,
    text_channels: Registry<TextChannel>,
    webhooks: Registry<Webhook>,
    client: LazyShared<Client>,
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    token: String,
    config: Config,
    requester: Option<Arc<dyn Requester>>,
    runtime: Option<Handle>,
}

impl SessionBuilder {
    /// Use this configuration instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Execute through this requester instead of an [`HttpRequester`].
    pub fn requester(mut self, requester: Arc<dyn Requester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Spawn queued operations on this runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyToken` if the token is blank
    /// - `SessionError::Transport` if the HTTP client cannot be built
    pub fn build(self) -> Result<Session, SessionError> {
        if self.token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let requester: Arc<dyn Requester> = match self.requester {
            Some(requester) => requester,
            None => Arc::new(HttpRequester::new(self.token, &self.config)?),
        };

        tracing::debug!(
            account_type = %self.config.account_type(),
            requester = requester.name(),
            "session created"
        );

        Ok(Session {
            inner: Arc::new(SessionInner {
                config: self.config,
                requester,
                runtime: self.runtime,
                users: Registry::new(),
                text_channels: Registry::new(),
                webhooks: Registry::new(),
                client: LazyShared::new(),
            }),
        })
    }
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("has_requester", &self.requester.is_some())
            .field("has_runtime", &self.runtime.is_some())
            .finish()
    }
}

/// Handle to one authenticated session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Start building a session for `token`.
    pub fn builder(token: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            token: token.into(),
            config: Config::default(),
            requester: None,
            runtime: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn account_type(&self) -> AccountType {
        self.inner.config.account_type()
    }

    pub fn requester(&self) -> &Arc<dyn Requester> {
        &self.inner.requester
    }

    /// Every user this session knows about.
    pub fn users(&self) -> &Registry<User> {
        &self.inner.users
    }

    pub fn text_channels(&self) -> &Registry<TextChannel> {
        &self.inner.text_channels
    }

    pub fn webhooks(&self) -> &Registry<Webhook> {
        &self.inner.webhooks
    }

    /// The client-account companion, created on first call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotClientAccount` for bot sessions.
    pub fn as_client(&self) -> Result<Arc<Client>, SessionError> {
        match self.account_type() {
            AccountType::Client => Ok(self
                .inner
                .client
                .get_or_init(|| Client::new(self.downgrade()))),
            other => Err(SessionError::NotClientAccount(other)),
        }
    }

    /// Builder for turning payloads into entities against this session.
    pub fn entity_builder(&self) -> EntityBuilder<'_> {
        EntityBuilder::new(self)
    }

    /// Write path for the event pipeline.
    pub fn ingest(&self) -> Ingestor<'_> {
        Ingestor::new(self)
    }

    /// A weak handle that does not keep the session alive.
    pub fn downgrade(&self) -> SessionRef {
        SessionRef(Arc::downgrade(&self.inner))
    }

    /// Whether two handles refer to the same session.
    pub fn ptr_eq(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run `action` on the async runtime and finish `completion` with it.
    pub(crate) fn dispatch<T: Send + 'static>(
        &self,
        action: RestAction<T>,
        completion: Completion<T>,
    ) {
        let template = action.route().template();
        let handle = match self
            .inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        {
            Some(handle) => handle,
            None => {
                tracing::warn!(route = template, "queued outside an async runtime");
                completion.failure(ActionError::NoRuntime);
                return;
            }
        };

        let requester = Arc::clone(&self.inner.requester);
        tracing::debug!(route = template, requester = requester.name(), "dispatching action");

        handle.spawn(async move {
            let route = action.route().clone();
            let payload = action.payload().cloned();
            let outcome = requester.execute(&route, payload.as_ref()).await;
            action.execute(outcome, completion);
        });
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account_type", &self.account_type())
            .field("api_base", &self.inner.config.api_base())
            .field("requester", &self.inner.requester.name())
            .field("users", &self.inner.users.len())
            .field("webhooks", &self.inner.webhooks.len())
            .finish()
    }
}

/// Weak handle to a [`Session`].
#[derive(Clone, Default)]
pub struct SessionRef(Weak<SessionInner>);

impl SessionRef {
    /// The session, if it is still alive.
    pub fn upgrade(&self) -> Option<Session> {
        self.0.upgrade().map(|inner| Session { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRef")
            .field("alive", &self.is_alive())
            .finish()
    }
}
