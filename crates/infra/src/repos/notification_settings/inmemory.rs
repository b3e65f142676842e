use super::INotificationSettingsRepo;
use randevu_reminders_domain::NotificationSettings;
use std::sync::Mutex;

pub struct InMemoryNotificationSettingsRepo {
    settings: Mutex<NotificationSettings>,
}

impl InMemoryNotificationSettingsRepo {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(Default::default()),
        }
    }
}

#[async_trait::async_trait]
impl INotificationSettingsRepo for InMemoryNotificationSettingsRepo {
    async fn get(&self) -> anyhow::Result<NotificationSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save(&self, settings: &NotificationSettings) -> anyhow::Result<()> {
        *self.settings.lock().unwrap() = settings.clone();
        Ok(())
    }
}
