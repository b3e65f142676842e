use crate::shared::usecase::UseCase;
use chrono::TimeZone;
use chrono_tz::Europe::Istanbul;
use randevu_reminders_domain::{Appointment, ReminderCandidate};
use randevu_reminders_infra::RandevuContext;
use tracing::{error, info};

pub const REMINDER_EMAIL_SUBJECT: &str = "Randevu Hatırlatması";

/// One reminder scan cycle: select scheduled appointments starting within
/// the next 30 minutes, drop the ones reminded too recently and dispatch a
/// notification for the rest.
#[derive(Debug, Default)]
pub struct SendAppointmentRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageQuery(anyhow::Error),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Appointments returned by the candidate query
    pub candidates: usize,
    /// Candidates for which a reminder attempt was recorded this cycle
    pub attempted: usize,
    /// Candidates skipped because their last reminder was too recent
    pub rate_limited: usize,
}

fn reminder_message(candidate: &ReminderCandidate) -> String {
    let start = Istanbul.timestamp_millis(candidate.appointment.appointment_time);
    format!(
        "Sayın {}, randevunuza 30 dakikadan az kaldı! ({})",
        candidate.customer.full_name,
        start.format("%H:%M")
    )
}

#[async_trait::async_trait]
impl UseCase for SendAppointmentRemindersUseCase {
    type Response = CycleSummary;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &RandevuContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();

        let candidates = ctx
            .repos
            .appointments
            .find_reminder_candidates(now)
            .await
            .map_err(UseCaseErrors::StorageQuery)?;

        if !candidates.is_empty() {
            info!(
                "Found {} appointments starting within the next 30 mins.",
                candidates.len()
            );
        }

        let settings = ctx
            .repos
            .notification_settings
            .get()
            .await
            .map_err(UseCaseErrors::StorageQuery)?;

        let mut summary = CycleSummary {
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            let appointment = &candidate.appointment;

            if appointment.is_rate_limited(now) {
                info!(
                    "Skipping appointment {}, last reminder was sent less than 10 mins ago.",
                    appointment.id
                );
                summary.rate_limited += 1;
                continue;
            }

            info!(
                "Sending reminder {}/{} for appointment {}",
                appointment.reminder_count + 1,
                Appointment::MAX_REMINDERS,
                appointment.id
            );
            let message = reminder_message(&candidate);

            if settings.email_enabled {
                if let Some(email) = &candidate.customer.email {
                    ctx.notifier
                        .send_email(email, REMINDER_EMAIL_SUBJECT, &message)
                        .await;
                }
            }

            // Reminder dispatch over SMS is gated off by default, the code
            // path stays available behind the config flag
            if ctx.config.sms_reminders_enabled && settings.sms_enabled {
                ctx.notifier
                    .send_sms(&candidate.customer.phone_number, &message)
                    .await;
            }

            // A failed or skipped delivery still consumes one of the tries,
            // the attempt is recorded no matter what the gateway reported
            if let Err(e) = ctx
                .repos
                .appointments
                .record_reminder_attempt(&appointment.id, now)
                .await
            {
                error!(
                    "Unable to record reminder attempt for appointment {}: {:?}",
                    appointment.id, e
                );
                continue;
            }
            summary.attempted += 1;
        }

        Ok(summary)
    }
}
