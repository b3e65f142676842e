use super::IAppointmentRepo;
use crate::repos::customer::ICustomerRepo;
use crate::repos::shared::inmemory_repo::*;
use randevu_reminders_domain::{Appointment, ReminderCandidate, ID};
use std::sync::Arc;

pub struct InMemoryAppointmentRepo {
    appointments: std::sync::Mutex<Vec<Appointment>>,
    customers: Arc<dyn ICustomerRepo>,
}

impl InMemoryAppointmentRepo {
    pub fn new(customers: Arc<dyn ICustomerRepo>) -> Self {
        Self {
            appointments: std::sync::Mutex::new(vec![]),
            customers,
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        insert(appointment, &self.appointments);
        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        save(appointment, &self.appointments);
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn delete(&self, appointment_id: &ID) -> Option<Appointment> {
        delete(appointment_id, &self.appointments)
    }

    async fn find_reminder_candidates(&self, now: i64) -> anyhow::Result<Vec<ReminderCandidate>> {
        let appointments = find_by(&self.appointments, |a: &Appointment| {
            a.is_reminder_candidate(now)
        });

        let mut candidates = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            // Appointments without a customer record cannot be notified
            if let Some(customer) = self.customers.find(&appointment.customer_id).await {
                candidates.push(ReminderCandidate {
                    appointment,
                    customer,
                });
            }
        }
        Ok(candidates)
    }

    async fn record_reminder_attempt(
        &self,
        appointment_id: &ID,
        sent_at: i64,
    ) -> anyhow::Result<()> {
        let _ = update_one(appointment_id, &self.appointments, |appointment| {
            if appointment.reminder_count < Appointment::MAX_REMINDERS {
                appointment.reminder_count += 1;
                appointment.last_reminder_sent_at = Some(sent_at);
            }
        });
        Ok(())
    }
}
