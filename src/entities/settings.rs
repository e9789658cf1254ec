//! entities::settings
//!
//! Account-level settings of a client account.
//!
//! Values are pushed by the ingestion path; readers always see the latest
//! complete update.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Presence status chosen by the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlineStatus {
    Online,
    Idle,
    #[serde(rename = "dnd")]
    DoNotDisturb,
    Invisible,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A partial settings change. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub status: Option<OnlineStatus>,
    pub locale: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone)]
struct SettingsState {
    status: OnlineStatus,
    locale: String,
    theme: String,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            status: OnlineStatus::Unknown,
            locale: "en-US".to_string(),
            theme: "dark".to_string(),
        }
    }
}

/// Settings companion of the client account.
#[derive(Debug, Default)]
pub struct UserSettings {
    state: RwLock<SettingsState>,
}

impl UserSettings {
    pub fn status(&self) -> OnlineStatus {
        self.state.read().status
    }

    pub fn locale(&self) -> String {
        self.state.read().locale.clone()
    }

    pub fn theme(&self) -> String {
        self.state.read().theme.clone()
    }

    pub(crate) fn apply(&self, update: SettingsUpdate) {
        let mut state = self.state.write();
        if let Some(status) = update.status {
            state.status = status;
        }
        if let Some(locale) = update.locale {
            state.locale = locale;
        }
        if let Some(theme) = update.theme {
            state.theme = theme;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_keeps_other_fields() {
        let settings = UserSettings::default();
        settings.apply(SettingsUpdate {
            status: Some(OnlineStatus::Idle),
            ..Default::default()
        });

        assert_eq!(settings.status(), OnlineStatus::Idle);
        assert_eq!(settings.locale(), "en-US");
        assert_eq!(settings.theme(), "dark");
    }

    #[test]
    fn update_from_json() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"status": "dnd", "theme": "light"}"#).unwrap();
        assert_eq!(update.status, Some(OnlineStatus::DoNotDisturb));
        assert_eq!(update.theme.as_deref(), Some("light"));
        assert!(update.locale.is_none());
    }

    #[test]
    fn unknown_status_tolerated() {
        let status: OnlineStatus = serde_json::from_str(r#""streaming""#).unwrap();
        assert_eq!(status, OnlineStatus::Unknown);
    }
}
