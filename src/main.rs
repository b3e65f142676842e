mod telemetry;

use randevu_reminders_core::start_send_reminders_job;
use randevu_reminders_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("randevu_reminders".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    start_send_reminders_job(context);

    // The reminder job runs on the background until the process is asked
    // to shut down.
    tokio::signal::ctrl_c().await
}
