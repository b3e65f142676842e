use super::{IEmailTransport, OutgoingEmail};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use randevu_reminders_domain::SmtpSettings;
use std::sync::Mutex;

/// Sends mail over SMTP with the credentials from the settings record.
pub struct SmtpEmailTransport {}

impl SmtpEmailTransport {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for SmtpEmailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailTransport for SmtpEmailTransport {
    async fn send(&self, smtp: &SmtpSettings, email: &OutgoingEmail) -> anyhow::Result<()> {
        let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
                .port(smtp.port)
                .credentials(creds)
                .build();

        let message = Message::builder()
            .from(format!("Salon Takip <{}>", smtp.username).parse()?)
            .to(email.to.parse()?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        mailer.send(message).await?;
        Ok(())
    }
}

/// Transport double for tests. Records outgoing mail instead of delivering
/// it and can be configured to fail every send.
pub struct InMemoryEmailTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    error: Option<String>,
}

impl InMemoryEmailTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            error: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            error: Some(error.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IEmailTransport for InMemoryEmailTransport {
    async fn send(&self, _smtp: &SmtpSettings, email: &OutgoingEmail) -> anyhow::Result<()> {
        if let Some(error) = &self.error {
            anyhow::bail!("{}", error);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
