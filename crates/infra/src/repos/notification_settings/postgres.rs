use super::INotificationSettingsRepo;
use randevu_reminders_domain::{NetgsmSettings, NotificationSettings, SmtpSettings};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresNotificationSettingsRepo {
    pool: PgPool,
}

impl PostgresNotificationSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationSettingsRaw {
    email_enabled: bool,
    sms_enabled: bool,
    smtp_host: Option<String>,
    smtp_port: Option<i32>,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    netgsm_user: Option<String>,
    netgsm_password: Option<String>,
    netgsm_header: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<NotificationSettingsRaw> for NotificationSettings {
    fn from(e: NotificationSettingsRaw) -> Self {
        // A channel is only considered configured when every credential of
        // the group is present, partial configuration loads as None
        let smtp = match (
            non_empty(e.smtp_host),
            non_empty(e.smtp_user),
            non_empty(e.smtp_pass),
        ) {
            (Some(host), Some(username), Some(password)) => Some(SmtpSettings {
                host,
                port: e
                    .smtp_port
                    .map(|p| p as u16)
                    .unwrap_or(SmtpSettings::DEFAULT_PORT),
                username,
                password,
            }),
            _ => None,
        };
        let netgsm = match (
            non_empty(e.netgsm_user),
            non_empty(e.netgsm_password),
            non_empty(e.netgsm_header),
        ) {
            (Some(user), Some(password), Some(header)) => Some(NetgsmSettings {
                user,
                password,
                header,
            }),
            _ => None,
        };

        Self {
            email_enabled: e.email_enabled,
            sms_enabled: e.sms_enabled,
            smtp,
            netgsm,
        }
    }
}

#[async_trait::async_trait]
impl INotificationSettingsRepo for PostgresNotificationSettingsRepo {
    async fn get(&self) -> anyhow::Result<NotificationSettings> {
        let res: Option<NotificationSettingsRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_settings
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find notification settings failed. DB returned error: {:?}",
                e
            );
            e
        })?;

        Ok(res.map(|settings| settings.into()).unwrap_or_default())
    }

    async fn save(&self, settings: &NotificationSettings) -> anyhow::Result<()> {
        let (smtp_host, smtp_port, smtp_user, smtp_pass) = match &settings.smtp {
            Some(smtp) => (
                Some(smtp.host.clone()),
                Some(smtp.port as i32),
                Some(smtp.username.clone()),
                Some(smtp.password.clone()),
            ),
            None => (None, None, None, None),
        };
        let (netgsm_user, netgsm_password, netgsm_header) = match &settings.netgsm {
            Some(netgsm) => (
                Some(netgsm.user.clone()),
                Some(netgsm.password.clone()),
                Some(netgsm.header.clone()),
            ),
            None => (None, None, None),
        };

        let res = sqlx::query(
            r#"
            UPDATE notification_settings
            SET email_enabled = $1,
            sms_enabled = $2,
            smtp_host = $3,
            smtp_port = $4,
            smtp_user = $5,
            smtp_pass = $6,
            netgsm_user = $7,
            netgsm_password = $8,
            netgsm_header = $9
            "#,
        )
        .bind(settings.email_enabled)
        .bind(settings.sms_enabled)
        .bind(&smtp_host)
        .bind(smtp_port)
        .bind(&smtp_user)
        .bind(&smtp_pass)
        .bind(&netgsm_user)
        .bind(&netgsm_password)
        .bind(&netgsm_header)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save notification settings. DB returned error: {:?}",
                e
            );
            e
        })?;

        // First save creates the singleton row
        if res.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO notification_settings
                (email_enabled, sms_enabled, smtp_host, smtp_port, smtp_user, smtp_pass, netgsm_user, netgsm_password, netgsm_header)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(settings.email_enabled)
            .bind(settings.sms_enabled)
            .bind(&smtp_host)
            .bind(smtp_port)
            .bind(&smtp_user)
            .bind(&smtp_pass)
            .bind(&netgsm_user)
            .bind(&netgsm_password)
            .bind(&netgsm_header)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert notification settings. DB returned error: {:?}",
                    e
                );
                e
            })?;
        }
        Ok(())
    }
}
