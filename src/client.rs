//! client
//!
//! Client-account features: groups, relationships, settings and OAuth2
//! applications.
//!
//! # Design
//!
//! A [`Client`] is the per-session companion obtained from
//! [`Session::as_client`](crate::session::Session::as_client). It is created
//! once, on first access, and shared thereafter.
//!
//! Every lookup returns either an `Option` or a freshly collected `Vec`.
//! Compound lookups ("the friend with this id") are a point lookup followed
//! by a kind check, so a blocked user is never returned as a friend.
//!
//! Application endpoints return [`RestAction`]s and do not register their
//! results; applications have no session-wide registry.

use std::fmt;
use std::sync::Arc;

use crate::core::types::Snowflake;
use crate::entities::{
    Application, AuthorizedApplication, Group, Member, Relationship, RelationshipType, User,
    UserSettings,
};
use crate::entity::{names_match, Entity};
use crate::registry::Registry;
use crate::rest::route::applications;
use crate::rest::RestAction;
use crate::session::{Session, SessionRef};

/// Client-account companion of a session.
pub struct Client {
    session: SessionRef,
    groups: Registry<Group>,
    relationships: Registry<Relationship>,
    settings: UserSettings,
}

impl Client {
    pub(crate) fn new(session: SessionRef) -> Self {
        tracing::debug!("client companion created");
        Self {
            session,
            groups: Registry::new(),
            relationships: Registry::new(),
            settings: UserSettings::default(),
        }
    }

    /// The owning session, if it is still alive.
    pub fn session(&self) -> Option<Session> {
        self.session.upgrade()
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub fn groups(&self) -> Vec<Arc<Group>> {
        self.groups.list()
    }

    /// Groups whose name matches. Unnamed groups never match.
    pub fn groups_by_name(&self, name: &str, ignore_case: bool) -> Vec<Arc<Group>> {
        self.groups.by_name(name, ignore_case)
    }

    pub fn group_by_id(&self, id: Snowflake) -> Option<Arc<Group>> {
        self.groups.get(id)
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    pub fn relationships(&self) -> Vec<Arc<Relationship>> {
        self.relationships.list()
    }

    pub fn relationships_of(&self, kind: RelationshipType) -> Vec<Arc<Relationship>> {
        self.relationships.filter(|r| r.kind() == kind)
    }

    pub fn relationships_of_named(
        &self,
        kind: RelationshipType,
        name: &str,
        ignore_case: bool,
    ) -> Vec<Arc<Relationship>> {
        self.relationships
            .filter(|r| r.kind() == kind && names_match(r.user().name(), name, ignore_case))
    }

    pub fn relationships_by_name(&self, name: &str, ignore_case: bool) -> Vec<Arc<Relationship>> {
        self.relationships.by_name(name, ignore_case)
    }

    pub fn relationship(&self, user: &User) -> Option<Arc<Relationship>> {
        self.relationship_by_id(user.id())
    }

    pub fn relationship_for_member(&self, member: &Member) -> Option<Arc<Relationship>> {
        self.relationship(member.user())
    }

    pub fn relationship_by_id(&self, id: Snowflake) -> Option<Arc<Relationship>> {
        self.relationships.get(id)
    }

    /// The relationship with `id`, only if it is of `kind`.
    pub fn relationship_by_id_of(
        &self,
        id: Snowflake,
        kind: RelationshipType,
    ) -> Option<Arc<Relationship>> {
        self.relationships.get_if(id, |r| r.kind() == kind)
    }

    // =========================================================================
    // Friends
    // =========================================================================

    pub fn friends(&self) -> Vec<Arc<Relationship>> {
        self.relationships_of(RelationshipType::Friend)
    }

    pub fn friends_by_name(&self, name: &str, ignore_case: bool) -> Vec<Arc<Relationship>> {
        self.relationships_of_named(RelationshipType::Friend, name, ignore_case)
    }

    pub fn friend(&self, user: &User) -> Option<Arc<Relationship>> {
        self.friend_by_id(user.id())
    }

    pub fn friend_for_member(&self, member: &Member) -> Option<Arc<Relationship>> {
        self.friend(member.user())
    }

    pub fn friend_by_id(&self, id: Snowflake) -> Option<Arc<Relationship>> {
        self.relationship_by_id_of(id, RelationshipType::Friend)
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Applications owned by the current account.
    pub fn applications(&self) -> RestAction<Vec<Application>> {
        RestAction::new(
            self.session.clone(),
            applications::GET_APPLICATIONS.compile([]),
            None,
            |session, response| {
                let builder = session.entity_builder();
                Ok(builder.create_list(response.array()?, |b, v| b.create_application(v))?)
            },
        )
    }

    pub fn application_by_id(&self, id: Snowflake) -> RestAction<Application> {
        RestAction::new(
            self.session.clone(),
            applications::GET_APPLICATION.compile([&id.to_string()]),
            None,
            |session, response| {
                let body = response.into_json()?;
                Ok(session.entity_builder().create_application(&body)?)
            },
        )
    }

    /// Third-party applications the current account has authorized.
    pub fn authorized_applications(&self) -> RestAction<Vec<AuthorizedApplication>> {
        RestAction::new(
            self.session.clone(),
            applications::GET_AUTHORIZED_APPLICATIONS.compile([]),
            None,
            |session, response| {
                let builder = session.entity_builder();
                Ok(builder.create_list(response.array()?, |b, v| {
                    b.create_authorized_application(v)
                })?)
            },
        )
    }

    /// Fetch one grant by its authorization record id
    /// ([`AuthorizedApplication::auth_id`]), not the application id.
    pub fn authorized_application_by_id(&self, id: Snowflake) -> RestAction<AuthorizedApplication> {
        RestAction::new(
            self.session.clone(),
            applications::GET_AUTHORIZED_APPLICATION.compile([&id.to_string()]),
            None,
            |session, response| {
                let body = response.into_json()?;
                Ok(session.entity_builder().create_authorized_application(&body)?)
            },
        )
    }

    pub(crate) fn group_registry(&self) -> &Registry<Group> {
        &self.groups
    }

    pub(crate) fn relationship_registry(&self) -> &Registry<Relationship> {
        &self.relationships
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("groups", &self.groups.len())
            .field("relationships", &self.relationships.len())
            .field("settings", &self.settings)
            .finish()
    }
}
