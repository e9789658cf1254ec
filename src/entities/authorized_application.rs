//! entities::authorized_application
//!
//! Third-party applications the current account has granted access to.
//!
//! An authorization has two ids: the authorization record itself (used to
//! revoke it) and the application it grants. Identity follows the
//! application; the record id only addresses the revoke route.

use std::fmt;

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};
use crate::rest::route::applications;
use crate::rest::RestAction;
use crate::session::SessionRef;

use super::application::app_icon_url;

/// An OAuth2 grant held by the current account.
pub struct AuthorizedApplication {
    pub(crate) auth_id: Snowflake,
    pub(crate) id: Snowflake,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) icon_id: Option<String>,
    pub(crate) scopes: Vec<String>,
    pub(crate) session: SessionRef,
}

impl AuthorizedApplication {
    /// Id of the authorization record.
    pub fn auth_id(&self) -> Snowflake {
        self.auth_id
    }

    /// Id of the authorized application.
    pub fn application_id(&self) -> Snowflake {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon_id(&self) -> Option<&str> {
        self.icon_id.as_deref()
    }

    pub fn icon_url(&self) -> Option<String> {
        app_icon_url(self.id, self.icon_id.as_deref())
    }

    /// Granted OAuth2 scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Revoke the authorization.
    pub fn delete(&self) -> RestAction<()> {
        RestAction::void(
            self.session.clone(),
            applications::DELETE_AUTHORIZED_APPLICATION.compile([&self.auth_id.to_string()]),
            None,
        )
    }
}

impl Entity for AuthorizedApplication {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for AuthorizedApplication {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl_identity!(AuthorizedApplication);

impl fmt::Debug for AuthorizedApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedApplication")
            .field("auth_id", &self.auth_id)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl fmt::Display for AuthorizedApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthorizedApplication:{}({})", self.name, self.id)
    }
}
