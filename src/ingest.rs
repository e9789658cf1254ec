//! ingest
//!
//! Registry write path for the real-time event pipeline.
//!
//! # Design
//!
//! Registries and the mutable entity fields are read-only to callers. The
//! event pipeline (gateway dispatch, or a test) writes them through an
//! [`Ingestor`] borrowed from the session. This is also the only path that
//! removes registry entries: deferred operations never evict, not even a
//! successful delete, because the remote API confirms the deletion with its
//! own event.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cordkit::core::types::Snowflake;
//! use cordkit::entities::Group;
//! use cordkit::rest::mock::MockRequester;
//! use cordkit::session::Session;
//!
//! let session = Session::builder("token")
//!     .requester(Arc::new(MockRequester::new()))
//!     .build()
//!     .unwrap();
//!
//! let id = Snowflake::parse("123456789012345").unwrap();
//! session.ingest().upsert_group(Group::new(id).with_name("demo")).unwrap();
//!
//! let client = session.as_client().unwrap();
//! assert_eq!(client.groups_by_name("DEMO", true).len(), 1);
//! assert!(client.groups_by_name("DEMO", false).is_empty());
//! ```

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::builder::BuildError;
use crate::core::types::Snowflake;
use crate::entities::{Group, Member, Relationship, SettingsUpdate, TextChannel, User, Webhook};
use crate::session::{Session, SessionError};

/// Errors from ingesting a payload.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Write access to one session's registries.
#[derive(Debug, Clone, Copy)]
pub struct Ingestor<'a> {
    session: &'a Session,
}

impl<'a> Ingestor<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    // =========================================================================
    // Users and channels
    // =========================================================================

    /// Insert or replace a user.
    pub fn upsert_user(&self, user: User) -> Arc<User> {
        let user = Arc::new(user);
        self.session.users().insert(Arc::clone(&user));
        user
    }

    pub fn remove_user(&self, id: Snowflake) -> Option<Arc<User>> {
        self.session.users().remove(id)
    }

    /// Insert or replace a text channel.
    pub fn upsert_text_channel(
        &self,
        id: Snowflake,
        guild_id: Snowflake,
        name: impl Into<String>,
    ) -> Arc<TextChannel> {
        let channel = Arc::new(TextChannel::new(
            self.session.downgrade(),
            id,
            guild_id,
            name,
        ));
        self.session.text_channels().insert(Arc::clone(&channel));
        channel
    }

    pub fn remove_text_channel(&self, id: Snowflake) -> Option<Arc<TextChannel>> {
        self.session.text_channels().remove(id)
    }

    // =========================================================================
    // Webhooks
    // =========================================================================

    /// Register or refresh a webhook from its payload.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` if the payload is malformed.
    pub fn upsert_webhook(&self, payload: &Value) -> Result<Arc<Webhook>, BuildError> {
        self.session.entity_builder().create_webhook(payload)
    }

    pub fn remove_webhook(&self, id: Snowflake) -> Option<Arc<Webhook>> {
        self.session.webhooks().remove(id)
    }

    /// Set a registered webhook's owner. Returns false if it is unknown.
    pub fn set_webhook_owner(&self, id: Snowflake, owner: Option<Member>) -> bool {
        self.with_webhook(id, |webhook| webhook.set_owner(owner.map(Arc::new)))
    }

    /// Set a registered webhook's default user. Returns false if it is unknown.
    pub fn set_webhook_default_user(&self, id: Snowflake, user: Option<Arc<User>>) -> bool {
        self.with_webhook(id, |webhook| webhook.set_default_user(user))
    }

    /// Set a registered webhook's token. Returns false if it is unknown.
    pub fn set_webhook_token(&self, id: Snowflake, token: Option<String>) -> bool {
        self.with_webhook(id, |webhook| webhook.set_token(token))
    }

    fn with_webhook(&self, id: Snowflake, apply: impl FnOnce(&Webhook)) -> bool {
        match self.session.webhooks().get(id) {
            Some(webhook) => {
                apply(&webhook);
                true
            }
            None => {
                tracing::debug!(%id, "update for unknown webhook ignored");
                false
            }
        }
    }

    // =========================================================================
    // Client account
    // =========================================================================

    /// Insert or replace a group.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotClientAccount` for bot sessions.
    pub fn upsert_group(&self, group: Group) -> Result<Arc<Group>, SessionError> {
        let group = Arc::new(group);
        self.session
            .as_client()?
            .group_registry()
            .insert(Arc::clone(&group));
        Ok(group)
    }

    /// Register a group from its payload.
    pub fn upsert_group_json(&self, payload: &Value) -> Result<Arc<Group>, IngestError> {
        let group = self.session.entity_builder().create_group(payload)?;
        Ok(self.upsert_group(group)?)
    }

    pub fn remove_group(&self, id: Snowflake) -> Result<Option<Arc<Group>>, SessionError> {
        Ok(self.session.as_client()?.group_registry().remove(id))
    }

    /// Insert or replace a relationship.
    pub fn upsert_relationship(
        &self,
        relationship: Relationship,
    ) -> Result<Arc<Relationship>, SessionError> {
        let relationship = Arc::new(relationship);
        self.session
            .as_client()?
            .relationship_registry()
            .insert(Arc::clone(&relationship));
        Ok(relationship)
    }

    /// Register a relationship from its payload.
    pub fn upsert_relationship_json(
        &self,
        payload: &Value,
    ) -> Result<Arc<Relationship>, IngestError> {
        let relationship = self.session.entity_builder().create_relationship(payload)?;
        Ok(self.upsert_relationship(relationship)?)
    }

    pub fn remove_relationship(
        &self,
        id: Snowflake,
    ) -> Result<Option<Arc<Relationship>>, SessionError> {
        Ok(self.session.as_client()?.relationship_registry().remove(id))
    }

    /// Apply a partial settings change.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<(), SessionError> {
        self.session.as_client()?.settings().apply(update);
        Ok(())
    }
}
