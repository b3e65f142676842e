use super::IAppointmentRepo;
use randevu_reminders_domain::{
    Appointment, AppointmentStatus, Customer, ReminderCandidate, ID,
};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    customer_uid: Uuid,
    service_name: String,
    appointment_time: i64,
    status: String,
    notification_sent: bool,
    reminder_count: i64,
    last_reminder_sent_at: Option<i64>,
}

impl From<AppointmentRaw> for Appointment {
    fn from(e: AppointmentRaw) -> Self {
        Self {
            id: e.appointment_uid.into(),
            customer_id: e.customer_uid.into(),
            service_name: e.service_name,
            appointment_time: e.appointment_time,
            status: e.status.parse::<AppointmentStatus>().unwrap(),
            notification_sent: e.notification_sent,
            reminder_count: e.reminder_count,
            last_reminder_sent_at: e.last_reminder_sent_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ReminderCandidateRaw {
    appointment_uid: Uuid,
    customer_uid: Uuid,
    service_name: String,
    appointment_time: i64,
    status: String,
    notification_sent: bool,
    reminder_count: i64,
    last_reminder_sent_at: Option<i64>,
    full_name: String,
    phone_number: String,
    email: Option<String>,
}

impl From<ReminderCandidateRaw> for ReminderCandidate {
    fn from(e: ReminderCandidateRaw) -> Self {
        Self {
            appointment: Appointment {
                id: e.appointment_uid.into(),
                customer_id: e.customer_uid.into(),
                service_name: e.service_name,
                appointment_time: e.appointment_time,
                status: e.status.parse::<AppointmentStatus>().unwrap(),
                notification_sent: e.notification_sent,
                reminder_count: e.reminder_count,
                last_reminder_sent_at: e.last_reminder_sent_at,
            },
            customer: Customer {
                id: e.customer_uid.into(),
                full_name: e.full_name,
                phone_number: e.phone_number,
                email: e.email,
            },
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
            (appointment_uid, customer_uid, service_name, appointment_time, status, notification_sent, reminder_count, last_reminder_sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.customer_id.inner_ref())
        .bind(&appointment.service_name)
        .bind(appointment.appointment_time)
        .bind(appointment.status.to_string())
        .bind(appointment.notification_sent)
        .bind(appointment.reminder_count)
        .bind(appointment.last_reminder_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert appointment: {:?}. DB returned error: {:?}",
                appointment, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET customer_uid = $2,
            service_name = $3,
            appointment_time = $4,
            status = $5,
            notification_sent = $6,
            reminder_count = $7,
            last_reminder_sent_at = $8
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.customer_id.inner_ref())
        .bind(&appointment.service_name)
        .bind(appointment.appointment_time)
        .bind(appointment.status.to_string())
        .bind(appointment.notification_sent)
        .bind(appointment.reminder_count)
        .bind(appointment.last_reminder_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save appointment: {:?}. DB returned error: {:?}",
                appointment, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        let res: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find appointment with id: {:?} failed. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })
        .ok()?;
        res.map(|appointment| appointment.into())
    }

    async fn delete(&self, appointment_id: &ID) -> Option<Appointment> {
        let res: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            DELETE FROM appointments
            WHERE appointment_uid = $1
            RETURNING *
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete appointment with id: {:?} failed. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })
        .ok()?;
        res.map(|appointment| appointment.into())
    }

    async fn find_reminder_candidates(&self, now: i64) -> anyhow::Result<Vec<ReminderCandidate>> {
        let candidates: Vec<ReminderCandidateRaw> = sqlx::query_as(
            r#"
            SELECT a.appointment_uid, a.customer_uid, a.service_name, a.appointment_time,
                   a.status, a.notification_sent, a.reminder_count, a.last_reminder_sent_at,
                   c.full_name, c.phone_number, c.email
            FROM appointments AS a
            INNER JOIN customers AS c ON a.customer_uid = c.customer_uid
            WHERE a.status = $1
            AND a.appointment_time >= $2
            AND a.appointment_time <= $3
            AND a.reminder_count < $4
            "#,
        )
        .bind(AppointmentStatus::Scheduled.to_string())
        .bind(now)
        .bind(now + Appointment::REMINDER_WINDOW_MILLIS)
        .bind(Appointment::MAX_REMINDERS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find reminder candidates at: {} failed. DB returned error: {:?}",
                now, e
            );
            e
        })?;

        Ok(candidates.into_iter().map(|c| c.into()).collect())
    }

    async fn record_reminder_attempt(
        &self,
        appointment_id: &ID,
        sent_at: i64,
    ) -> anyhow::Result<()> {
        // The predicate keeps the increment atomic with the cap check, two
        // racing updates cannot push the count past the cap
        sqlx::query(
            r#"
            UPDATE appointments
            SET reminder_count = reminder_count + 1,
            last_reminder_sent_at = $2
            WHERE appointment_uid = $1
            AND reminder_count < $3
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(sent_at)
        .bind(Appointment::MAX_REMINDERS)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to record reminder attempt for appointment: {:?}. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })?;
        Ok(())
    }
}
