//! entities::relationship
//!
//! Friend, block and pending-request relationships of a client account.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};

use super::User;

/// Kind of relationship, with its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RelationshipType {
    Friend = 1,
    Blocked = 2,
    IncomingFriendRequest = 3,
    OutgoingFriendRequest = 4,
}

impl RelationshipType {
    /// Resolve a wire key. Unknown keys yield `None`.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            1 => Some(Self::Friend),
            2 => Some(Self::Blocked),
            3 => Some(Self::IncomingFriendRequest),
            4 => Some(Self::OutgoingFriendRequest),
            _ => None,
        }
    }

    pub fn key(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RelationshipType {
    type Error = String;

    fn try_from(key: u8) -> Result<Self, Self::Error> {
        Self::from_key(key).ok_or_else(|| format!("unknown relationship type {key}"))
    }
}

impl From<RelationshipType> for u8 {
    fn from(kind: RelationshipType) -> Self {
        kind.key()
    }
}

/// The current account's relationship with another user.
///
/// Shares its id and name with the user.
#[derive(Debug, Clone)]
pub struct Relationship {
    user: Arc<User>,
    kind: RelationshipType,
}

impl Relationship {
    pub fn new(user: Arc<User>, kind: RelationshipType) -> Self {
        Self { user, kind }
    }

    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    pub fn kind(&self) -> RelationshipType {
        self.kind
    }

    pub fn is_friend(&self) -> bool {
        self.kind == RelationshipType::Friend
    }
}

impl Entity for Relationship {
    fn id(&self) -> Snowflake {
        self.user.id()
    }
}

impl Named for Relationship {
    fn name(&self) -> Option<String> {
        Some(self.user.name().to_string())
    }
}

impl_identity!(Relationship);

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}({})", self.kind, self.user.name(), self.user.id())
    }
}
