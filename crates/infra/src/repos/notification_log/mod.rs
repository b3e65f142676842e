mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;
use randevu_reminders_domain::NotificationLog;

#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()>;
    /// Most recent delivery attempts first
    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<NotificationLog>>;
}

#[cfg(test)]
mod tests {
    use crate::Repos;
    use randevu_reminders_domain::{NotificationLog, NotificationStatus, NotificationType};

    fn log_at(sent_at: i64) -> NotificationLog {
        NotificationLog {
            id: Default::default(),
            notification_type: NotificationType::Email,
            recipient: "ayse@example.com".into(),
            subject: Some("Randevu Hatırlatması".into()),
            status: NotificationStatus::Success,
            error_message: None,
            sent_at,
        }
    }

    #[tokio::test]
    async fn find_recent_orders_newest_first_and_limits() {
        let repos = Repos::create_inmemory();
        for sent_at in [1000, 3000, 2000].iter() {
            repos
                .notification_logs
                .insert(&log_at(*sent_at))
                .await
                .expect("To insert log");
        }

        let logs = repos
            .notification_logs
            .find_recent(2)
            .await
            .expect("To list logs");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].sent_at, 3000);
        assert_eq!(logs[1].sent_at, 2000);
    }
}
