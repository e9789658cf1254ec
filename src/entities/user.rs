//! entities::user
//!
//! Users and guild members.

use std::fmt;
use std::sync::Arc;

use crate::core::types::Snowflake;
use crate::entity::{impl_identity, Entity, Named};

use super::CDN_BASE;

/// A user account.
#[derive(Debug, Clone)]
pub struct User {
    id: Snowflake,
    name: String,
    discriminator: String,
    avatar_id: Option<String>,
    bot: bool,
}

impl User {
    /// Create a user with a name and no other details.
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            discriminator: "0000".to_string(),
            avatar_id: None,
            bot: false,
        }
    }

    /// Set the four-digit discriminator.
    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = discriminator.into();
        self
    }

    /// Set the avatar hash.
    pub fn with_avatar(mut self, avatar_id: impl Into<String>) -> Self {
        self.avatar_id = Some(avatar_id.into());
        self
    }

    /// Mark the account as a bot.
    pub fn with_bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn avatar_id(&self) -> Option<&str> {
        self.avatar_id.as_deref()
    }

    /// Avatar image URL, if the user has a custom avatar.
    ///
    /// Animated avatars (hash prefixed `a_`) are served as GIF.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar_id.as_ref().map(|hash| {
            let ext = if hash.starts_with("a_") { "gif" } else { "png" };
            format!("{CDN_BASE}/avatars/{}/{hash}.{ext}", self.id)
        })
    }

    pub fn is_bot(&self) -> bool {
        self.bot
    }

    /// Whether every profile field matches `other`.
    pub(crate) fn same_profile(&self, other: &User) -> bool {
        self.name == other.name
            && self.discriminator == other.discriminator
            && self.avatar_id == other.avatar_id
            && self.bot == other.bot
    }
}

impl Entity for User {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Named for User {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl_identity!(User);

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U:{}({})", self.name, self.id)
    }
}

/// A user's membership in one guild.
///
/// Shares its id with the user.
#[derive(Debug, Clone)]
pub struct Member {
    user: Arc<User>,
    guild_id: Snowflake,
    nickname: Option<String>,
}

impl Member {
    pub fn new(user: Arc<User>, guild_id: Snowflake) -> Self {
        Self {
            user,
            guild_id,
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// The nickname if set, otherwise the user name.
    pub fn effective_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(self.user.name())
    }
}

impl Entity for Member {
    fn id(&self) -> Snowflake {
        self.user.id()
    }
}

impl Named for Member {
    fn name(&self) -> Option<String> {
        Some(self.effective_name().to_string())
    }
}

impl_identity!(Member);

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MB:{}({})", self.effective_name(), self.guild_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn alice() -> User {
        User::new(Snowflake::new(1), "alice").with_discriminator("0420")
    }

    #[test]
    fn identity_ignores_fields() {
        let a = alice();
        let b = User::new(Snowflake::new(1), "renamed");
        assert_eq!(a, b);

        let set: HashSet<User> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn avatar_url_formats() {
        assert_eq!(alice().avatar_url(), None);
        assert_eq!(
            alice().with_avatar("abc").avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/1/abc.png")
        );
        assert_eq!(
            alice().with_avatar("a_abc").avatar_url().as_deref(),
            Some("https://cdn.discordapp.com/avatars/1/a_abc.gif")
        );
    }

    #[test]
    fn display() {
        assert_eq!(alice().to_string(), "U:alice(1)");
    }

    #[test]
    fn member_uses_user_identity() {
        let user = Arc::new(alice());
        let member = Member::new(Arc::clone(&user), Snowflake::new(9));
        assert_eq!(member.id(), user.id());
        assert_eq!(Named::name(&member).as_deref(), Some("alice"));

        let nicked = member.with_nickname("al");
        assert_eq!(nicked.effective_name(), "al");
        assert_eq!(nicked.nickname(), Some("al"));
    }
}
