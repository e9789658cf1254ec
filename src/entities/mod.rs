//! entities
//!
//! Concrete remote entity kinds.
//!
//! # Modules
//!
//! - `user`: [`User`] and [`Member`]
//! - `channel`: [`TextChannel`]
//! - `application`: [`Application`]
//! - `authorized_application`: [`AuthorizedApplication`]
//! - `webhook`: [`Webhook`], [`WebhookManager`], [`WebhookManagerUpdatable`]
//! - `group`: [`Group`]
//! - `relationship`: [`Relationship`], [`RelationshipType`]
//! - `settings`: [`UserSettings`]
//!
//! Every kind implements [`Entity`](crate::entity::Entity) and compares by
//! id alone. `Display` output follows `Kind:name(id)`.

mod application;
mod authorized_application;
mod channel;
mod group;
mod relationship;
mod settings;
mod user;
mod webhook;

pub use application::Application;
pub use authorized_application::AuthorizedApplication;
pub use channel::TextChannel;
pub use group::Group;
pub use relationship::{Relationship, RelationshipType};
pub use settings::{OnlineStatus, SettingsUpdate, UserSettings};
pub use user::{Member, User};
pub use webhook::{Webhook, WebhookManager, WebhookManagerUpdatable};

/// Base URL of the media CDN.
pub const CDN_BASE: &str = "https://cdn.discordapp.com";
