mod job_scheduler;
mod reminders;
mod shared;

pub use job_scheduler::start_send_reminders_job;
pub use reminders::{CycleSummary, SendAppointmentRemindersUseCase};
pub use shared::usecase::{execute, UseCase};
