//! entities::application
//!
//! OAuth2 applications owned by the current account.

use std::fmt;

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};

use super::CDN_BASE;

/// Format the CDN URL of an application icon.
pub(crate) fn app_icon_url(id: Snowflake, icon_id: Option<&str>) -> Option<String> {
    icon_id.map(|icon| format!("{CDN_BASE}/app-icons/{id}/{icon}.jpg"))
}

/// An application registered by the current account.
#[derive(Clone)]
pub struct Application {
    pub(crate) id: Snowflake,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) icon_id: Option<String>,
    pub(crate) redirect_uris: Vec<String>,
    pub(crate) rpc_origins: Vec<String>,
    pub(crate) bot_public: bool,
    pub(crate) bot_require_code_grant: bool,
    pub(crate) secret: String,
}

impl Application {
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

    pub fn redirect_uris(&self) -> &[String] {
        &self.redirect_uris
    }

    pub fn rpc_origins(&self) -> &[String] {
        &self.rpc_origins
    }

    /// Whether anyone may add the application's bot to a guild.
    pub fn is_bot_public(&self) -> bool {
        self.bot_public
    }

    pub fn bot_requires_code_grant(&self) -> bool {
        self.bot_require_code_grant
    }

    /// The client secret. Never logged or printed by this crate.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Entity for Application {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for Application {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl_identity!(Application);

// Custom Debug to avoid exposing the secret
impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon_id", &self.icon_id)
            .field("bot_public", &self.bot_public)
            .field("has_secret", &!self.secret.is_empty())
            .finish()
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Application:{}({})", self.name, self.id)
    }
}
