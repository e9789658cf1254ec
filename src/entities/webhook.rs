//! entities::webhook
//!
//! Channel webhooks and their managers.
//!
//! # Design
//!
//! A [`Webhook`] keeps a weak link to its channel: the channel registry owns
//! channels, and a webhook must not keep a removed channel alive. Owner,
//! default user and token arrive after construction and are written only by
//! the ingestion path; every read takes a short lock on that state.
//!
//! Each webhook has two companions created on first use and shared from
//! then on:
//!
//! - [`WebhookManager`] sends one field change per request.
//! - [`WebhookManagerUpdatable`] stages several changes and sends them in a
//!   single request.
//!
//! The token is a credential. It appears in [`Webhook::url`] and in the
//! token delete route, never in `Debug` or `Display` output.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::core::config::DEFAULT_API_BASE;
use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};
use crate::lazy::LazyShared;
use crate::rest::route::webhooks;
use crate::rest::{RawResponse, ResponseBody, RestAction};
use crate::session::{Session, SessionRef};

use super::{Member, TextChannel, User};

#[derive(Default)]
struct WebhookState {
    owner: Option<Arc<Member>>,
    default_user: Option<Arc<User>>,
    token: Option<String>,
}

/// A webhook attached to a guild text channel.
pub struct Webhook {
    id: Snowflake,
    guild_id: Snowflake,
    channel_id: Snowflake,
    channel: Weak<TextChannel>,
    session: SessionRef,
    state: RwLock<WebhookState>,
    manager: LazyShared<WebhookManager>,
    manager_updatable: LazyShared<WebhookManagerUpdatable>,
}

impl Webhook {
    pub(crate) fn new(
        session: SessionRef,
        id: Snowflake,
        guild_id: Snowflake,
        channel_id: Snowflake,
        channel: Weak<TextChannel>,
    ) -> Self {
        Self {
            id,
            guild_id,
            channel_id,
            channel,
            session,
            state: RwLock::new(WebhookState::default()),
            manager: LazyShared::new(),
            manager_updatable: LazyShared::new(),
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    /// The channel this webhook posts to.
    ///
    /// Falls back to the session's channel registry when the original
    /// channel instance has been replaced. `None` once the channel is gone.
    pub fn channel(&self) -> Option<Arc<TextChannel>> {
        self.channel.upgrade().or_else(|| {
            self.session
                .upgrade()
                .and_then(|session| session.text_channels().get(self.channel_id))
        })
    }

    /// The member who created the webhook, when known.
    pub fn owner(&self) -> Option<Arc<Member>> {
        self.state.read().owner.clone()
    }

    /// The user identity the webhook posts as.
    pub fn default_user(&self) -> Option<Arc<User>> {
        self.state.read().default_user.clone()
    }

    /// The webhook's display name (its default user's name).
    pub fn name(&self) -> Option<String> {
        self.state
            .read()
            .default_user
            .as_ref()
            .map(|user| user.name().to_string())
    }

    /// The secret token, when known.
    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    /// Execute URL, `{api_base}/webhooks/{id}/{token}`.
    ///
    /// `None` when the token is not known.
    pub fn url(&self) -> Option<String> {
        let token = self.token()?;
        let base = match self.session.upgrade() {
            Some(session) => session.config().api_base().to_string(),
            None => DEFAULT_API_BASE.to_string(),
        };
        Some(format!("{base}/webhooks/{}/{token}", self.id))
    }

    /// Delete the webhook.
    ///
    /// Uses the token route when the token is known, so no account
    /// permissions are needed; otherwise the authenticated route.
    pub fn delete(&self) -> RestAction<()> {
        let id = self.id.to_string();
        let route = match self.token() {
            Some(token) => webhooks::DELETE_TOKEN_WEBHOOK.compile([&id, &token]),
            None => webhooks::DELETE_WEBHOOK.compile([&id]),
        };
        RestAction::void(self.session.clone(), route, None)
    }

    /// The shared immediate-update manager, created on first call.
    pub fn manager(self: &Arc<Self>) -> Arc<WebhookManager> {
        self.manager.get_or_init(|| WebhookManager {
            webhook: Arc::downgrade(self),
            webhook_id: self.id,
            session: self.session.clone(),
        })
    }

    /// The shared staged-update manager, created on first call.
    pub fn manager_updatable(self: &Arc<Self>) -> Arc<WebhookManagerUpdatable> {
        self.manager_updatable
            .get_or_init(|| WebhookManagerUpdatable {
                webhook: Arc::downgrade(self),
                webhook_id: self.id,
                session: self.session.clone(),
                staged: Mutex::new(Staged::default()),
            })
    }

    pub(crate) fn set_owner(&self, owner: Option<Arc<Member>>) {
        self.state.write().owner = owner;
    }

    pub(crate) fn set_default_user(&self, user: Option<Arc<User>>) {
        self.state.write().default_user = user;
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        self.state.write().token = token;
    }
}

impl Entity for Webhook {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for Webhook {
    fn name(&self) -> Option<String> {
        Webhook::name(self)
    }
}

impl_identity!(Webhook);

// Custom Debug to avoid exposing the token
impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Webhook")
            .field("id", &self.id)
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .field("default_user", &state.default_user)
            .field("has_token", &state.token.is_some())
            .finish()
    }
}

impl fmt::Display for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "WH:{}({})", name, self.id),
            None => write!(f, "WH({})", self.id),
        }
    }
}

/// Refresh the registry from a modify response body.
///
/// The remote API answers a successful modify with the updated webhook.
fn refresh(session: &Session, response: &RawResponse) -> Result<(), crate::rest::ActionError> {
    if let ResponseBody::Json(value @ Value::Object(_)) = response.body() {
        session.entity_builder().create_webhook(value)?;
    }
    Ok(())
}

fn modify(session: &SessionRef, webhook_id: Snowflake, payload: Map<String, Value>) -> RestAction<()> {
    RestAction::new(
        session.clone(),
        webhooks::MODIFY_WEBHOOK.compile([&webhook_id.to_string()]),
        Some(Value::Object(payload)),
        |session, response| refresh(session, &response),
    )
}

/// Sends one webhook field change per request.
pub struct WebhookManager {
    webhook: Weak<Webhook>,
    webhook_id: Snowflake,
    session: SessionRef,
}

impl WebhookManager {
    /// The managed webhook, if it is still alive.
    pub fn webhook(&self) -> Option<Arc<Webhook>> {
        self.webhook.upgrade()
    }

    /// Rename the webhook.
    pub fn set_name(&self, name: impl Into<String>) -> RestAction<()> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), Value::String(name.into()));
        modify(&self.session, self.webhook_id, payload)
    }

    /// Move the webhook to another channel of the same guild.
    pub fn set_channel(&self, channel_id: Snowflake) -> RestAction<()> {
        let mut payload = Map::new();
        payload.insert("channel_id".to_string(), Value::String(channel_id.to_string()));
        modify(&self.session, self.webhook_id, payload)
    }
}

impl fmt::Debug for WebhookManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookManager")
            .field("webhook_id", &self.webhook_id)
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
struct Staged {
    name: Option<String>,
    channel_id: Option<Snowflake>,
}

/// Stages webhook field changes and sends them together.
pub struct WebhookManagerUpdatable {
    webhook: Weak<Webhook>,
    webhook_id: Snowflake,
    session: SessionRef,
    staged: Mutex<Staged>,
}

impl WebhookManagerUpdatable {
    /// The managed webhook, if it is still alive.
    pub fn webhook(&self) -> Option<Arc<Webhook>> {
        self.webhook.upgrade()
    }

    /// Stage a new name.
    pub fn stage_name(&self, name: impl Into<String>) {
        self.staged.lock().name = Some(name.into());
    }

    /// Stage a new channel.
    pub fn stage_channel(&self, channel_id: Snowflake) {
        self.staged.lock().channel_id = Some(channel_id);
    }

    pub fn staged_name(&self) -> Option<String> {
        self.staged.lock().name.clone()
    }

    pub fn staged_channel(&self) -> Option<Snowflake> {
        self.staged.lock().channel_id
    }

    /// Whether any change is staged.
    pub fn is_dirty(&self) -> bool {
        let staged = self.staged.lock();
        staged.name.is_some() || staged.channel_id.is_some()
    }

    /// Discard every staged change.
    pub fn reset(&self) {
        *self.staged.lock() = Staged::default();
    }

    /// Send the staged changes in one request and clear them.
    ///
    /// With nothing staged the action succeeds without a request.
    pub fn update(&self) -> RestAction<()> {
        let staged = std::mem::take(&mut *self.staged.lock());
        if staged.name.is_none() && staged.channel_id.is_none() {
            return RestAction::ready(
                self.session.clone(),
                webhooks::MODIFY_WEBHOOK.compile([&self.webhook_id.to_string()]),
                (),
            );
        }
        let mut payload = Map::new();
        if let Some(name) = staged.name {
            payload.insert("name".to_string(), Value::String(name));
        }
        if let Some(channel_id) = staged.channel_id {
            payload.insert("channel_id".to_string(), Value::String(channel_id.to_string()));
        }
        modify(&self.session, self.webhook_id, payload)
    }
}

impl fmt::Debug for WebhookManagerUpdatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookManagerUpdatable")
            .field("webhook_id", &self.webhook_id)
            .field("staged", &*self.staged.lock())
            .finish()
    }
}
