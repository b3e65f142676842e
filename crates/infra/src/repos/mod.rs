mod appointment;
mod customer;
mod notification_log;
mod notification_settings;
mod shared;

pub use appointment::IAppointmentRepo;
use appointment::{InMemoryAppointmentRepo, PostgresAppointmentRepo};
pub use customer::ICustomerRepo;
use customer::{InMemoryCustomerRepo, PostgresCustomerRepo};
pub use notification_log::INotificationLogRepo;
use notification_log::{InMemoryNotificationLogRepo, PostgresNotificationLogRepo};
pub use notification_settings::INotificationSettingsRepo;
use notification_settings::{InMemoryNotificationSettingsRepo, PostgresNotificationSettingsRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub customers: Arc<dyn ICustomerRepo>,
    pub notification_settings: Arc<dyn INotificationSettingsRepo>,
    pub notification_logs: Arc<dyn INotificationLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        // This is needed to make sure that db is ready when starting the job
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            customers: Arc::new(PostgresCustomerRepo::new(pool.clone())),
            notification_settings: Arc::new(PostgresNotificationSettingsRepo::new(pool.clone())),
            notification_logs: Arc::new(PostgresNotificationLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let customers = Arc::new(InMemoryCustomerRepo::new());
        Self {
            appointments: Arc::new(InMemoryAppointmentRepo::new(customers.clone())),
            customers,
            notification_settings: Arc::new(InMemoryNotificationSettingsRepo::new()),
            notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
        }
    }
}
