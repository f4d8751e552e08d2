//! User profile and notification preferences.
//!
//! # Invariants
//! - A missing profile behaves exactly like `UserProfile::default()`.
//! - `email`, when non-empty, has a `local@domain.tld` shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Named notification toggles shown on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSetting {
    DailyReminders,
    DeadlineReminders,
    WeeklyDigest,
    EmailNotifications,
}

impl NotificationSetting {
    pub const ALL: [Self; 4] = [
        Self::DailyReminders,
        Self::DeadlineReminders,
        Self::WeeklyDigest,
        Self::EmailNotifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DailyReminders => "daily_reminders",
            Self::DeadlineReminders => "deadline_reminders",
            Self::WeeklyDigest => "weekly_digest",
            Self::EmailNotifications => "email_notifications",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|setting| setting.as_str() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub daily_reminders: bool,
    pub deadline_reminders: bool,
    pub weekly_digest: bool,
    pub email_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            daily_reminders: true,
            deadline_reminders: true,
            weekly_digest: false,
            email_notifications: true,
        }
    }
}

impl NotificationSettings {
    pub fn get(&self, setting: NotificationSetting) -> bool {
        match setting {
            NotificationSetting::DailyReminders => self.daily_reminders,
            NotificationSetting::DeadlineReminders => self.deadline_reminders,
            NotificationSetting::WeeklyDigest => self.weekly_digest,
            NotificationSetting::EmailNotifications => self.email_notifications,
        }
    }

    /// Flips one setting and returns its new value.
    pub fn toggle(&mut self, setting: NotificationSetting) -> bool {
        let slot = match setting {
            NotificationSetting::DailyReminders => &mut self.daily_reminders,
            NotificationSetting::DeadlineReminders => &mut self.deadline_reminders,
            NotificationSetting::WeeklyDigest => &mut self.weekly_digest,
            NotificationSetting::EmailNotifications => &mut self.email_notifications,
        };
        *slot = !*slot;
        *slot
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub notification_settings: NotificationSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    InvalidEmail(String),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for ProfileValidationError {}

impl UserProfile {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let email = self.email.trim();
        if !email.is_empty() && !EMAIL_RE.is_match(email) {
            return Err(ProfileValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationSetting, NotificationSettings, UserProfile};

    #[test]
    fn setting_names_parse_with_dashes() {
        assert_eq!(
            NotificationSetting::parse("weekly-digest"),
            Some(NotificationSetting::WeeklyDigest)
        );
        assert_eq!(NotificationSetting::parse("sms"), None);
    }

    #[test]
    fn toggle_flips_only_one_setting() {
        let mut settings = NotificationSettings::default();
        assert!(settings.toggle(NotificationSetting::WeeklyDigest));
        assert!(settings.daily_reminders);
        assert!(settings.deadline_reminders);
        assert!(settings.email_notifications);
    }

    #[test]
    fn validate_accepts_empty_and_rejects_malformed_email() {
        let mut profile = UserProfile::default();
        assert!(profile.validate().is_ok());
        profile.email = "someone@example.com".to_string();
        assert!(profile.validate().is_ok());
        profile.email = "not-an-email".to_string();
        assert!(profile.validate().is_err());
    }
}
