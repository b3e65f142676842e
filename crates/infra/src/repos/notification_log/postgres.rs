use super::INotificationLogRepo;
use randevu_reminders_domain::{NotificationLog, NotificationStatus, NotificationType};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    log_uid: Uuid,
    notification_type: String,
    recipient: String,
    subject: Option<String>,
    status: String,
    error_message: Option<String>,
    sent_at: i64,
}

impl From<NotificationLogRaw> for NotificationLog {
    fn from(e: NotificationLogRaw) -> Self {
        Self {
            id: e.log_uid.into(),
            notification_type: e.notification_type.parse::<NotificationType>().unwrap(),
            recipient: e.recipient,
            subject: e.subject,
            status: e.status.parse::<NotificationStatus>().unwrap(),
            error_message: e.error_message,
            sent_at: e.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn insert(&self, log: &NotificationLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs
            (log_uid, notification_type, recipient, subject, status, error_message, sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log.id.inner_ref())
        .bind(log.notification_type.to_string())
        .bind(&log.recipient)
        .bind(&log.subject)
        .bind(log.status.to_string())
        .bind(&log.error_message)
        .bind(log.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert notification log: {:?}. DB returned error: {:?}",
                log, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_recent(&self, limit: usize) -> anyhow::Result<Vec<NotificationLog>> {
        let logs: Vec<NotificationLogRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_logs
            ORDER BY sent_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find recent notification logs failed. DB returned error: {:?}",
                e
            );
            e
        })?;

        Ok(logs.into_iter().map(|log| log.into()).collect())
    }
}
