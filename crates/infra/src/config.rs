use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// How often, in seconds, a reminder scan cycle runs
    pub reminder_interval_secs: u64,
    /// Whether the reminder scheduler is allowed to use the SMS channel.
    /// The gateway keeps the SMS code path regardless, this flag only gates
    /// reminder dispatch over it.
    pub sms_reminders_enabled: bool,
}

impl Config {
    pub fn new() -> Self {
        let default_interval = "60";
        let reminder_interval_secs =
            std::env::var("REMINDER_INTERVAL_SECS").unwrap_or_else(|_| default_interval.into());
        let reminder_interval_secs = match reminder_interval_secs.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given REMINDER_INTERVAL_SECS: {} is not valid, falling back to the default interval: {}.",
                    reminder_interval_secs, default_interval
                );
                default_interval.parse::<u64>().unwrap()
            }
        };

        let sms_reminders_enabled = match std::env::var("SMS_REMINDERS_ENABLED") {
            Ok(value) => value == "true" || value == "1",
            Err(_) => false,
        };

        Self {
            reminder_interval_secs,
            sms_reminders_enabled,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
