mod appointment;
mod customer;
mod notification;
mod shared;

pub use appointment::{Appointment, AppointmentStatus, ReminderCandidate};
pub use customer::Customer;
pub use notification::{
    NetgsmSettings, NotificationLog, NotificationSettings, NotificationStatus, NotificationType,
    SmtpSettings,
};
pub use shared::entity::{Entity, ID};
