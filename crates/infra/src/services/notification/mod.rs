mod email;
mod sms;

use crate::repos::{INotificationLogRepo, INotificationSettingsRepo};
use crate::system::ISys;
pub use email::{InMemoryEmailTransport, SmtpEmailTransport};
use randevu_reminders_domain::{
    NetgsmSettings, NotificationLog, NotificationStatus, NotificationType, SmtpSettings,
};
pub use sms::{InMemorySmsTransport, NetgsmSmsTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

/// Upper bound on one provider call so a stalled provider cannot stall a
/// whole scan cycle. A timed out call still counts as an attempt.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of one send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDisposition {
    /// The provider accepted the message. One success log row was written.
    Sent,
    /// A real delivery attempt was made and failed. One error log row was
    /// written.
    Failed,
    /// The channel is disabled or not configured, no attempt was made and
    /// nothing was logged.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct OutgoingSms {
    pub to: String,
    pub message: String,
}

#[async_trait::async_trait]
pub trait IEmailTransport: Send + Sync {
    async fn send(&self, smtp: &SmtpSettings, email: &OutgoingEmail) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
pub trait ISmsTransport: Send + Sync {
    /// Returns the raw provider response body
    async fn send(&self, netgsm: &NetgsmSettings, sms: &OutgoingSms) -> anyhow::Result<String>;
}

/// Attempts exactly one delivery per call and reports the outcome as a
/// value. Provider failures are caught and logged here, they never reach
/// the caller.
#[derive(Clone)]
pub struct NotificationService {
    settings: Arc<dyn INotificationSettingsRepo>,
    logs: Arc<dyn INotificationLogRepo>,
    email_transport: Arc<dyn IEmailTransport>,
    sms_transport: Arc<dyn ISmsTransport>,
    sys: Arc<dyn ISys>,
}

impl NotificationService {
    pub fn new(
        settings: Arc<dyn INotificationSettingsRepo>,
        logs: Arc<dyn INotificationLogRepo>,
        email_transport: Arc<dyn IEmailTransport>,
        sms_transport: Arc<dyn ISmsTransport>,
        sys: Arc<dyn ISys>,
    ) -> Self {
        Self {
            settings,
            logs,
            email_transport,
            sms_transport,
            sys,
        }
    }

    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> SendDisposition {
        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Unable to read notification settings: {:?}", e);
                return SendDisposition::Skipped;
            }
        };
        if !settings.email_enabled {
            info!("Email disabled in settings. Skipping.");
            return SendDisposition::Skipped;
        }
        let smtp = match settings.smtp {
            Some(smtp) => smtp,
            None => {
                info!(
                    "Missing SMTP credentials, skipping real send. To: {} | Subject: {}",
                    to, subject
                );
                return SendDisposition::Skipped;
            }
        };

        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        let sent = match timeout(PROVIDER_TIMEOUT, self.email_transport.send(&smtp, &email)).await
        {
            Ok(sent) => sent,
            Err(_) => Err(anyhow::anyhow!(
                "SMTP send timed out after {:?}",
                PROVIDER_TIMEOUT
            )),
        };

        match sent {
            Ok(()) => {
                self.write_log(
                    NotificationType::Email,
                    to,
                    Some(subject),
                    NotificationStatus::Success,
                    None,
                )
                .await;
                SendDisposition::Sent
            }
            Err(e) => {
                error!("Failed to send email: {:?}", e);
                self.write_log(
                    NotificationType::Email,
                    to,
                    Some(subject),
                    NotificationStatus::Error,
                    Some(e.to_string()),
                )
                .await;
                SendDisposition::Failed
            }
        }
    }

    pub async fn send_sms(&self, to: &str, message: &str) -> SendDisposition {
        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Unable to read notification settings: {:?}", e);
                return SendDisposition::Skipped;
            }
        };
        if !settings.sms_enabled {
            info!("SMS disabled in settings. Skipping.");
            return SendDisposition::Skipped;
        }
        let netgsm = match settings.netgsm {
            Some(netgsm) => netgsm,
            None => {
                info!(
                    "Missing Netgsm credentials, skipping real send. To: {} | Msg: {}",
                    to, message
                );
                return SendDisposition::Skipped;
            }
        };

        let outgoing = OutgoingSms {
            to: to.to_string(),
            message: message.to_string(),
        };
        let response = match timeout(
            PROVIDER_TIMEOUT,
            self.sms_transport.send(&netgsm, &outgoing),
        )
        .await
        {
            Ok(response) => response,
            Err(_) => Err(anyhow::anyhow!(
                "Netgsm send timed out after {:?}",
                PROVIDER_TIMEOUT
            )),
        };

        match response {
            Ok(response) if !sms::is_netgsm_error(&response) => {
                self.write_log(
                    NotificationType::Sms,
                    to,
                    Some("SMS Notification"),
                    NotificationStatus::Success,
                    None,
                )
                .await;
                SendDisposition::Sent
            }
            Ok(response) => {
                error!("Netgsm rejected SMS: {}", response);
                self.write_log(
                    NotificationType::Sms,
                    to,
                    Some("SMS Notification"),
                    NotificationStatus::Error,
                    Some(format!("Netgsm error: {}", response)),
                )
                .await;
                SendDisposition::Failed
            }
            Err(e) => {
                error!("Failed to send SMS: {:?}", e);
                self.write_log(
                    NotificationType::Sms,
                    to,
                    Some("SMS Notification"),
                    NotificationStatus::Error,
                    Some(e.to_string()),
                )
                .await;
                SendDisposition::Failed
            }
        }
    }

    async fn write_log(
        &self,
        notification_type: NotificationType,
        recipient: &str,
        subject: Option<&str>,
        status: NotificationStatus,
        error_message: Option<String>,
    ) {
        let log = NotificationLog {
            id: Default::default(),
            notification_type,
            recipient: recipient.to_string(),
            subject: subject.map(|s| s.to_string()),
            status,
            error_message,
            sent_at: self.sys.get_timestamp_millis(),
        };
        if let Err(e) = self.logs.insert(&log).await {
            error!(
                "Unable to record notification log: {:?}. DB returned error: {:?}",
                log, e
            );
        }
    }
}
