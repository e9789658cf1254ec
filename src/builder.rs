//! builder
//!
//! Turns JSON payloads from the remote API into entities.
//!
//! # Design
//!
//! Each entity kind has a private wire struct that mirrors the payload and
//! is deserialized with serde; the builder then resolves nested references
//! (users, channels) through the session registries so that every reference
//! to one id shares one `Arc`.
//!
//! Kinds with a session-wide registry (users, webhooks) are registered as a
//! side effect of building. Client-account kinds (groups, relationships) are
//! returned unregistered; [`Ingestor`](crate::ingest::Ingestor) decides
//! where they go.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cordkit::rest::mock::MockRequester;
//! use cordkit::session::Session;
//! use serde_json::json;
//!
//! let session = Session::builder("token")
//!     .requester(Arc::new(MockRequester::new()))
//!     .build()
//!     .unwrap();
//!
//! let app = session
//!     .entity_builder()
//!     .create_application(&json!({"id": "123456789012345", "name": "demo"}))
//!     .unwrap();
//! assert_eq!(app.name(), "demo");
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::types::Snowflake;
use crate::entities::{
    Application, AuthorizedApplication, Group, Member, Relationship, RelationshipType, User,
    Webhook,
};
use crate::session::Session;

/// Errors from building entities out of payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The body was not the JSON shape the operation expects.
    #[error("expected {expected} body, found {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A payload was missing a field or had a field of the wrong type.
    #[error("invalid {entity} payload: {message}")]
    Invalid {
        entity: &'static str,
        message: String,
    },
}

#[derive(Deserialize)]
struct WireUser {
    id: Snowflake,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    bot: bool,
}

#[derive(Deserialize)]
struct WireApplication {
    id: Snowflake,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
    #[serde(default)]
    rpc_origins: Vec<String>,
    #[serde(default)]
    bot_public: bool,
    #[serde(default)]
    bot_require_code_grant: bool,
    #[serde(default)]
    secret: Option<String>,
}

#[derive(Deserialize)]
struct WireAuthorizedApplication {
    id: Snowflake,
    #[serde(default)]
    scopes: Vec<String>,
    application: WireApplicationRef,
}

#[derive(Deserialize)]
struct WireApplicationRef {
    id: Snowflake,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Deserialize)]
struct WireWebhook {
    id: Snowflake,
    guild_id: Snowflake,
    channel_id: Snowflake,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<Value>,
}

#[derive(Deserialize)]
struct WireGroup {
    id: Snowflake,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    owner_id: Option<Snowflake>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Deserialize)]
struct WireRelationship {
    #[serde(rename = "type")]
    kind: RelationshipType,
    user: Value,
}

fn parse<T: DeserializeOwned>(entity: &'static str, value: &Value) -> Result<T, BuildError> {
    T::deserialize(value).map_err(|e| {
        tracing::warn!(entity, error = %e, "malformed entity payload");
        BuildError::Invalid {
            entity,
            message: e.to_string(),
        }
    })
}

/// Builds entities against one session's registries.
#[derive(Debug, Clone, Copy)]
pub struct EntityBuilder<'a> {
    session: &'a Session,
}

impl<'a> EntityBuilder<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Build every element of a JSON array with `build`.
    ///
    /// Fails on the first element that fails.
    pub fn create_list<T>(
        &self,
        values: &[Value],
        build: impl Fn(&Self, &Value) -> Result<T, BuildError>,
    ) -> Result<Vec<T>, BuildError> {
        values.iter().map(|value| build(self, value)).collect()
    }

    /// Resolve a user payload to the registered user.
    ///
    /// The registered instance is replaced only when the profile changed.
    pub fn create_user(&self, value: &Value) -> Result<Arc<User>, BuildError> {
        let wire: WireUser = parse("user", value)?;
        let mut user = User::new(wire.id, wire.username).with_bot(wire.bot);
        if let Some(discriminator) = wire.discriminator {
            user = user.with_discriminator(discriminator);
        }
        if let Some(avatar) = wire.avatar {
            user = user.with_avatar(avatar);
        }

        let users = self.session.users();
        match users.get(wire.id) {
            Some(existing) if existing.same_profile(&user) => Ok(existing),
            _ => {
                let user = Arc::new(user);
                users.insert(Arc::clone(&user));
                Ok(user)
            }
        }
    }

    /// Build an application owned by the current account.
    pub fn create_application(&self, value: &Value) -> Result<Application, BuildError> {
        let wire: WireApplication = parse("application", value)?;
        Ok(Application {
            id: wire.id,
            name: wire.name,
            description: wire.description.unwrap_or_default(),
            icon_id: wire.icon,
            redirect_uris: wire.redirect_uris,
            rpc_origins: wire.rpc_origins,
            bot_public: wire.bot_public,
            bot_require_code_grant: wire.bot_require_code_grant,
            secret: wire.secret.unwrap_or_default(),
        })
    }

    /// Build an authorization record.
    pub fn create_authorized_application(
        &self,
        value: &Value,
    ) -> Result<AuthorizedApplication, BuildError> {
        let wire: WireAuthorizedApplication = parse("authorized application", value)?;
        Ok(AuthorizedApplication {
            auth_id: wire.id,
            id: wire.application.id,
            name: wire.application.name,
            description: wire.application.description.unwrap_or_default(),
            icon_id: wire.application.icon,
            scopes: wire.scopes,
            session: self.session.downgrade(),
        })
    }

    /// Resolve a webhook payload to the registered webhook.
    ///
    /// An existing webhook keeps its identity and gets its mutable fields
    /// refreshed; a token absent from the payload leaves the known token in
    /// place. A webhook that moved channel is replaced by a new instance
    /// linked to the new channel.
    pub fn create_webhook(&self, value: &Value) -> Result<Arc<Webhook>, BuildError> {
        let wire: WireWebhook = parse("webhook", value)?;

        let owner = match &wire.user {
            Some(user) => Some(Arc::new(Member::new(
                self.create_user(user)?,
                wire.guild_id,
            ))),
            None => None,
        };

        let mut default_user =
            User::new(wire.id, wire.name.unwrap_or_default()).with_bot(true);
        if let Some(avatar) = wire.avatar {
            default_user = default_user.with_avatar(avatar);
        }

        let webhooks = self.session.webhooks();
        let registered = webhooks.get_or_insert_with(wire.id, || {
            self.new_webhook(wire.id, wire.guild_id, wire.channel_id)
        });
        let webhook = if registered.channel_id() == wire.channel_id {
            registered
        } else {
            tracing::debug!(id = %wire.id, channel = %wire.channel_id, "webhook moved channel");
            let moved = Arc::new(self.new_webhook(wire.id, wire.guild_id, wire.channel_id));
            moved.set_owner(registered.owner());
            moved.set_token(registered.token());
            webhooks.insert(Arc::clone(&moved));
            moved
        };

        webhook.set_default_user(Some(Arc::new(default_user)));
        if owner.is_some() {
            webhook.set_owner(owner);
        }
        if wire.token.is_some() {
            webhook.set_token(wire.token);
        }
        Ok(webhook)
    }

    fn new_webhook(&self, id: Snowflake, guild_id: Snowflake, channel_id: Snowflake) -> Webhook {
        let channel = self
            .session
            .text_channels()
            .get(channel_id)
            .map(|channel| Arc::downgrade(&channel))
            .unwrap_or_default();
        Webhook::new(self.session.downgrade(), id, guild_id, channel_id, channel)
    }

    /// Build a private group. Not registered.
    pub fn create_group(&self, value: &Value) -> Result<Group, BuildError> {
        let wire: WireGroup = parse("group", value)?;
        let mut group = Group::new(wire.id);
        if let Some(name) = wire.name {
            group = group.with_name(name);
        }
        if let Some(owner_id) = wire.owner_id {
            group = group.with_owner(owner_id);
        }
        if let Some(icon) = wire.icon {
            group = group.with_icon(icon);
        }
        Ok(group)
    }

    /// Build a relationship. The user is registered; the relationship is not.
    pub fn create_relationship(&self, value: &Value) -> Result<Relationship, BuildError> {
        let wire: WireRelationship = parse("relationship", value)?;
        let user = self.create_user(&wire.user)?;
        Ok(Relationship::new(user, wire.kind))
    }
}
