//! entities::channel
//!
//! Guild text channels.

use std::fmt;
use std::sync::Arc;

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};
use crate::rest::route::channels;
use crate::rest::RestAction;
use crate::session::SessionRef;

use super::Webhook;

/// A text channel in a guild.
pub struct TextChannel {
    id: Snowflake,
    guild_id: Snowflake,
    name: String,
    session: SessionRef,
}

impl TextChannel {
    pub(crate) fn new(
        session: SessionRef,
        id: Snowflake,
        guild_id: Snowflake,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            session,
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch every webhook attached to this channel.
    ///
    /// On success each webhook is registered in the session's webhook
    /// registry and the registered instances are returned.
    pub fn webhooks(&self) -> RestAction<Vec<Arc<Webhook>>> {
        RestAction::new(
            self.session.clone(),
            channels::GET_WEBHOOKS.compile([&self.id.to_string()]),
            None,
            |session, response| {
                let builder = session.entity_builder();
                let webhooks = builder.create_list(response.array()?, |b, v| b.create_webhook(v))?;
                Ok(webhooks)
            },
        )
    }
}

impl Entity for TextChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for TextChannel {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl_identity!(TextChannel);

impl fmt::Debug for TextChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChannel")
            .field("id", &self.id)
            .field("guild_id", &self.guild_id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for TextChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TC:{}({})", self.name, self.id)
    }
}
