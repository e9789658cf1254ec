//! entities::group
//!
//! Private group channels of a client account.

use std::fmt;

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};

/// A private multi-user conversation.
///
/// Groups may be unnamed.
#[derive(Debug, Clone)]
pub struct Group {
    id: Snowflake,
    name: Option<String>,
    owner_id: Option<Snowflake>,
    icon_id: Option<String>,
}

impl Group {
    pub fn new(id: Snowflake) -> Self {
        Self {
            id,
            name: None,
            owner_id: None,
            icon_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_owner(mut self, owner_id: Snowflake) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_icon(mut self, icon_id: impl Into<String>) -> Self {
        self.icon_id = Some(icon_id.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn owner_id(&self) -> Option<Snowflake> {
        self.owner_id
    }

    pub fn icon_id(&self) -> Option<&str> {
        self.icon_id.as_deref()
    }
}

impl Entity for Group {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for Group {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

impl_identity!(Group);

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "G:{}({})", name, self.id),
            None => write!(f, "G({})", self.id),
        }
    }
}
