use crate::customer::Customer;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        };
        write!(f, "{}", status)
    }
}

#[derive(Error, Debug)]
pub enum InvalidStatusError {
    #[error("Status: {0} is not a valid appointment status")]
    Malformed(String),
}

impl FromStr for AppointmentStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            _ => Err(InvalidStatusError::Malformed(s.to_string())),
        }
    }
}

/// A booked salon appointment. Owned by the booking flow, this service only
/// reads it and advances the reminder fields after a dispatch attempt.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: ID,
    pub customer_id: ID,
    pub service_name: String,
    /// Timestamp in millis at which the service is scheduled to begin
    pub appointment_time: i64,
    pub status: AppointmentStatus,
    /// Legacy single-shot notification flag. Superseded by `reminder_count`
    /// and only kept for schema compatibility with the booking application.
    pub notification_sent: bool,
    /// Number of reminders already dispatched for this appointment
    pub reminder_count: i64,
    /// Timestamp in millis of the most recent reminder attempt
    pub last_reminder_sent_at: Option<i64>,
}

impl Appointment {
    /// Reminders per appointment are capped, a failed delivery attempt also
    /// counts against the cap.
    pub const MAX_REMINDERS: i64 = 3;
    /// How far ahead of the appointment start reminders are considered
    pub const REMINDER_WINDOW_MILLIS: i64 = 1000 * 60 * 30;
    /// Minimum spacing between two reminders for the same appointment
    pub const REMINDER_SPACING_MILLIS: i64 = 1000 * 60 * 10;

    pub fn new(customer_id: ID, service_name: String, appointment_time: i64) -> Self {
        Self {
            id: Default::default(),
            customer_id,
            service_name,
            appointment_time,
            status: AppointmentStatus::Scheduled,
            notification_sent: false,
            reminder_count: 0,
            last_reminder_sent_at: None,
        }
    }

    /// Whether this appointment should be picked up by a reminder scan
    /// running at `now`. Mirrors the candidate query in the appointment
    /// repository.
    pub fn is_reminder_candidate(&self, now: i64) -> bool {
        self.status == AppointmentStatus::Scheduled
            && self.appointment_time >= now
            && self.appointment_time <= now + Self::REMINDER_WINDOW_MILLIS
            && self.reminder_count < Self::MAX_REMINDERS
    }

    /// Whether a reminder for this appointment was dispatched too recently
    /// for another one to go out.
    pub fn is_rate_limited(&self, now: i64) -> bool {
        match self.last_reminder_sent_at {
            Some(last_sent_at) => now - last_sent_at < Self::REMINDER_SPACING_MILLIS,
            None => false,
        }
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// An appointment joined with the customer it belongs to, as returned by
/// the reminder candidate query.
#[derive(Debug, Clone)]
pub struct ReminderCandidate {
    pub appointment: Appointment,
    pub customer: Customer,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_appointment(appointment_time: i64) -> Appointment {
        Appointment::new(Default::default(), "Saç Kesimi".into(), appointment_time)
    }

    #[test]
    fn candidate_window_is_inclusive_on_both_bounds() {
        let now = 1000 * 60 * 60;

        assert!(scheduled_appointment(now).is_reminder_candidate(now));
        assert!(scheduled_appointment(now + Appointment::REMINDER_WINDOW_MILLIS)
            .is_reminder_candidate(now));

        assert!(!scheduled_appointment(now - 1).is_reminder_candidate(now));
        assert!(
            !scheduled_appointment(now + Appointment::REMINDER_WINDOW_MILLIS + 1)
                .is_reminder_candidate(now)
        );
    }

    #[test]
    fn only_scheduled_appointments_are_candidates() {
        let now = 1000 * 60 * 60;
        let mut appointment = scheduled_appointment(now + 1000 * 60 * 15);
        assert!(appointment.is_reminder_candidate(now));

        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ]
        .iter()
        {
            appointment.status = *status;
            assert!(!appointment.is_reminder_candidate(now));
        }
    }

    #[test]
    fn reminder_cap_excludes_appointment_from_candidates() {
        let now = 1000 * 60 * 60;
        let mut appointment = scheduled_appointment(now + 1000 * 60 * 15);

        appointment.reminder_count = Appointment::MAX_REMINDERS - 1;
        assert!(appointment.is_reminder_candidate(now));

        appointment.reminder_count = Appointment::MAX_REMINDERS;
        assert!(!appointment.is_reminder_candidate(now));
    }

    #[test]
    fn rate_limit_applies_within_spacing_window() {
        let now = 1000 * 60 * 60;
        let mut appointment = scheduled_appointment(now + 1000 * 60 * 15);
        assert!(!appointment.is_rate_limited(now));

        appointment.last_reminder_sent_at = Some(now - 1000 * 60 * 5);
        assert!(appointment.is_rate_limited(now));

        // Exactly at the spacing boundary the appointment is due again
        appointment.last_reminder_sent_at = Some(now - Appointment::REMINDER_SPACING_MILLIS);
        assert!(!appointment.is_rate_limited(now));

        appointment.last_reminder_sent_at = Some(now - 1000 * 60 * 11);
        assert!(!appointment.is_rate_limited(now));
    }

    #[test]
    fn status_roundtrips_through_string_representation() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ]
        .iter()
        {
            assert_eq!(status.to_string().parse::<AppointmentStatus>().unwrap(), *status);
        }
        assert!("pending".parse::<AppointmentStatus>().is_err());
    }
}
