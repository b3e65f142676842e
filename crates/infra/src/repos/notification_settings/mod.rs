mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationSettingsRepo;
pub use postgres::PostgresNotificationSettingsRepo;
use randevu_reminders_domain::NotificationSettings;

#[async_trait::async_trait]
pub trait INotificationSettingsRepo: Send + Sync {
    /// The singleton settings record. Returns the defaults (all channels
    /// disabled) when nothing has been saved yet.
    async fn get(&self) -> anyhow::Result<NotificationSettings>;
    async fn save(&self, settings: &NotificationSettings) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::Repos;
    use randevu_reminders_domain::{NotificationSettings, SmtpSettings};

    #[tokio::test]
    async fn get_returns_defaults_before_first_save() {
        let repos = Repos::create_inmemory();
        let settings = repos
            .notification_settings
            .get()
            .await
            .expect("To get settings");
        assert_eq!(settings, NotificationSettings::default());
    }

    #[tokio::test]
    async fn saved_settings_are_returned_on_get() {
        let repos = Repos::create_inmemory();
        let settings = NotificationSettings {
            email_enabled: true,
            sms_enabled: false,
            smtp: Some(SmtpSettings {
                host: "smtp.example.com".into(),
                port: SmtpSettings::DEFAULT_PORT,
                username: "salon@example.com".into(),
                password: "hunter2".into(),
            }),
            netgsm: None,
        };
        repos
            .notification_settings
            .save(&settings)
            .await
            .expect("To save settings");

        let found = repos
            .notification_settings
            .get()
            .await
            .expect("To get settings");
        assert_eq!(found, settings);
    }
}
