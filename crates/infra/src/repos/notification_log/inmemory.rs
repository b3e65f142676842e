use super::INotificationLogRepo;
use crate::repos::shared::inmemory_repo::*;
use randevu_reminders_domain::NotificationLog;

pub struct InMemoryNotificationLogRepo {
    logs: std::sync::Mutex<Vec<NotificationLog>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new() -> Self {
        Self {
            logs: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        insert(log, &self.logs);
        Ok(())
    }

    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<NotificationLog>> {
        let mut logs = find_by(&self.logs, |_: &NotificationLog| true);
        logs.sort_by(|l1, l2| l2.sent_at.cmp(&l1.sent_at));
        logs.truncate(limit);
        Ok(logs)
    }
}
