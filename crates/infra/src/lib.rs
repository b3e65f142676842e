mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::Repos;
pub use repos::{
    IAppointmentRepo, ICustomerRepo, INotificationLogRepo, INotificationSettingsRepo,
};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct RandevuContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: NotificationService,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl RandevuContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let notifier = NotificationService::new(
            repos.notification_settings.clone(),
            repos.notification_logs.clone(),
            Arc::new(SmtpEmailTransport::new()),
            Arc::new(NetgsmSmsTransport::new()),
            sys.clone(),
        );
        Self {
            repos,
            config: Config::new(),
            sys,
            notifier,
        }
    }

    /// Context backed by in memory repositories and transports. Used by
    /// tests, nothing leaves the process.
    pub fn create_inmemory() -> Self {
        let repos = Repos::create_inmemory();
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let notifier = NotificationService::new(
            repos.notification_settings.clone(),
            repos.notification_logs.clone(),
            Arc::new(InMemoryEmailTransport::new()),
            Arc::new(InMemorySmsTransport::new()),
            sys.clone(),
        );
        Self {
            repos,
            config: Config::new(),
            sys,
            notifier,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> RandevuContext {
    RandevuContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}
