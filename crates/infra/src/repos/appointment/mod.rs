mod inmemory;
mod postgres;

pub use inmemory::InMemoryAppointmentRepo;
use randevu_reminders_domain::{Appointment, ReminderCandidate, ID};
pub use postgres::PostgresAppointmentRepo;

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    async fn delete(&self, appointment_id: &ID) -> Option<Appointment>;
    /// Scheduled appointments starting within the reminder window from
    /// `now`, still under the reminder cap, joined with their customer
    async fn find_reminder_candidates(&self, now: i64) -> anyhow::Result<Vec<ReminderCandidate>>;
    /// Increments the reminder count and stamps the attempt time in one
    /// atomic update. A no-op for appointments already at the cap.
    async fn record_reminder_attempt(&self, appointment_id: &ID, sent_at: i64)
        -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repos;
    use randevu_reminders_domain::{AppointmentStatus, Customer};

    async fn insert_customer(repos: &Repos) -> Customer {
        let customer = Customer::new(
            "Ayşe Yılmaz".into(),
            "5551234567".into(),
            Some("ayse@example.com".into()),
        );
        repos
            .customers
            .insert(&customer)
            .await
            .expect("To insert customer");
        customer
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let repos = Repos::create_inmemory();
        let customer = insert_customer(&repos).await;

        let mut appointment = Appointment::new(customer.id.clone(), "Boya".into(), 1000 * 60 * 60);
        repos
            .appointments
            .insert(&appointment)
            .await
            .expect("To insert appointment");

        let found = repos.appointments.find(&appointment.id).await.unwrap();
        assert_eq!(found.service_name, "Boya");

        appointment.status = AppointmentStatus::Completed;
        repos
            .appointments
            .save(&appointment)
            .await
            .expect("To save appointment");
        let found = repos.appointments.find(&appointment.id).await.unwrap();
        assert_eq!(found.status, AppointmentStatus::Completed);

        assert!(repos.appointments.delete(&appointment.id).await.is_some());
        assert!(repos.appointments.find(&appointment.id).await.is_none());
    }

    #[tokio::test]
    async fn candidate_query_filters_and_joins_customer() {
        let repos = Repos::create_inmemory();
        let customer = insert_customer(&repos).await;
        let now = 1000 * 60 * 60;

        let in_window = Appointment::new(customer.id.clone(), "Saç Kesimi".into(), now + 1000 * 60 * 15);
        let out_of_window =
            Appointment::new(customer.id.clone(), "Saç Kesimi".into(), now + 1000 * 60 * 45);
        let mut cancelled =
            Appointment::new(customer.id.clone(), "Saç Kesimi".into(), now + 1000 * 60 * 15);
        cancelled.status = AppointmentStatus::Cancelled;
        let mut capped =
            Appointment::new(customer.id.clone(), "Saç Kesimi".into(), now + 1000 * 60 * 15);
        capped.reminder_count = Appointment::MAX_REMINDERS;

        for appointment in [&in_window, &out_of_window, &cancelled, &capped].iter() {
            repos
                .appointments
                .insert(appointment)
                .await
                .expect("To insert appointment");
        }

        let candidates = repos
            .appointments
            .find_reminder_candidates(now)
            .await
            .expect("To query candidates");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].appointment.id, in_window.id);
        assert_eq!(candidates[0].customer.id, customer.id);
    }

    #[tokio::test]
    async fn candidate_window_bounds_are_inclusive() {
        let repos = Repos::create_inmemory();
        let customer = insert_customer(&repos).await;
        let now = 1000 * 60 * 60;

        let at_lower = Appointment::new(customer.id.clone(), "Boya".into(), now);
        let at_upper = Appointment::new(
            customer.id.clone(),
            "Boya".into(),
            now + Appointment::REMINDER_WINDOW_MILLIS,
        );
        let past = Appointment::new(customer.id.clone(), "Boya".into(), now - 1);
        for appointment in [&at_lower, &at_upper, &past].iter() {
            repos
                .appointments
                .insert(appointment)
                .await
                .expect("To insert appointment");
        }

        let candidates = repos
            .appointments
            .find_reminder_candidates(now)
            .await
            .expect("To query candidates");
        assert_eq!(candidates.len(), 2);
    }

    #[tokio::test]
    async fn recording_attempts_increments_until_the_cap() {
        let repos = Repos::create_inmemory();
        let customer = insert_customer(&repos).await;
        let appointment = Appointment::new(customer.id.clone(), "Manikür".into(), 1000 * 60 * 60);
        repos
            .appointments
            .insert(&appointment)
            .await
            .expect("To insert appointment");

        for attempt in 1..=Appointment::MAX_REMINDERS {
            repos
                .appointments
                .record_reminder_attempt(&appointment.id, 1000 * attempt)
                .await
                .expect("To record attempt");
            let found = repos.appointments.find(&appointment.id).await.unwrap();
            assert_eq!(found.reminder_count, attempt);
            assert_eq!(found.last_reminder_sent_at, Some(1000 * attempt));
        }

        // A fourth attempt must not push the count past the cap
        repos
            .appointments
            .record_reminder_attempt(&appointment.id, 5000)
            .await
            .expect("To record attempt");
        let found = repos.appointments.find(&appointment.id).await.unwrap();
        assert_eq!(found.reminder_count, Appointment::MAX_REMINDERS);
        assert_eq!(
            found.last_reminder_sent_at,
            Some(1000 * Appointment::MAX_REMINDERS)
        );
    }
}
