use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// SMTP credentials for the email channel. Only materialized when every
/// required field is configured, a partially filled in channel loads as
/// `None` on the settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpSettings {
    pub const DEFAULT_PORT: u16 = 587;
}

/// Netgsm credentials for the SMS channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetgsmSettings {
    pub user: String,
    pub password: String,
    /// Sender name registered with the provider
    pub header: String,
}

/// Singleton notification configuration. Mutated by the settings screen of
/// the booking application, read-only from this service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub smtp: Option<SmtpSettings>,
    pub netgsm: Option<NetgsmSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Email,
    Sms,
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Sms => write!(f, "sms"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Success,
    Error,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InvalidNotificationFieldError {
    #[error("{0} is not a valid notification log field value")]
    Malformed(String),
}

impl FromStr for NotificationType {
    type Err = InvalidNotificationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            _ => Err(InvalidNotificationFieldError::Malformed(s.to_string())),
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = InvalidNotificationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            _ => Err(InvalidNotificationFieldError::Malformed(s.to_string())),
        }
    }
}

/// One delivery attempt as recorded by the notification gateway. Append
/// only, written once per real provider call.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    pub id: ID,
    pub notification_type: NotificationType,
    pub recipient: String,
    pub subject: Option<String>,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
    pub sent_at: i64,
}

impl Entity for NotificationLog {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_have_all_channels_disabled() {
        let settings = NotificationSettings::default();
        assert!(!settings.email_enabled);
        assert!(!settings.sms_enabled);
        assert!(settings.smtp.is_none());
        assert!(settings.netgsm.is_none());
    }

    #[test]
    fn log_field_values_roundtrip_through_string_representation() {
        assert_eq!(
            "email".parse::<NotificationType>().unwrap(),
            NotificationType::Email
        );
        assert_eq!("sms".parse::<NotificationType>().unwrap(), NotificationType::Sms);
        assert_eq!(
            "success".parse::<NotificationStatus>().unwrap(),
            NotificationStatus::Success
        );
        assert_eq!(
            "error".parse::<NotificationStatus>().unwrap(),
            NotificationStatus::Error
        );
        assert!("webhook".parse::<NotificationType>().is_err());
    }
}
