use super::{ISmsTransport, OutgoingSms};
use randevu_reminders_domain::NetgsmSettings;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Mutex;

const NETGSM_SMS_URL: &str = "https://api.netgsm.com.tr/sms/send/xml";

/// The XML API returns a short status body, an ID on success or an error
/// code. These are the error code prefixes.
const NETGSM_ERROR_PREFIXES: [&str; 4] = ["30", "40", "50", "70"];

pub fn is_netgsm_error(response: &str) -> bool {
    NETGSM_ERROR_PREFIXES
        .iter()
        .any(|prefix| response.starts_with(prefix))
}

fn build_request_body(netgsm: &NetgsmSettings, sms: &OutgoingSms) -> String {
    format!(
        r#"<?xml version="1.0"?>
<mainbody>
    <header>
        <company dil="TR">Netgsm</company>
        <usercode>{}</usercode>
        <password>{}</password>
        <type>1:n</type>
        <msgheader>{}</msgheader>
    </header>
    <body>
        <msg><![CDATA[{}]]></msg>
        <no>{}</no>
    </body>
</mainbody>"#,
        netgsm.user, netgsm.password, netgsm.header, sms.message, sms.to
    )
}

/// Sends SMS through the Netgsm XML API.
pub struct NetgsmSmsTransport {
    client: Client,
}

impl NetgsmSmsTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for NetgsmSmsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsTransport for NetgsmSmsTransport {
    async fn send(&self, netgsm: &NetgsmSettings, sms: &OutgoingSms) -> anyhow::Result<String> {
        let response = self
            .client
            .post(NETGSM_SMS_URL)
            .header(CONTENT_TYPE, "text/xml")
            .body(build_request_body(netgsm, sms))
            .send()
            .await?;

        let body = response.text().await?;
        Ok(body)
    }
}

/// Transport double for tests. Records outgoing messages and answers with
/// a canned provider response.
pub struct InMemorySmsTransport {
    sent: Mutex<Vec<OutgoingSms>>,
    response: String,
    error: Option<String>,
}

impl InMemorySmsTransport {
    pub fn new() -> Self {
        Self::with_response("00 12345678")
    }

    pub fn with_response(response: &str) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            response: response.to_string(),
            error: None,
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            response: String::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ISmsTransport for InMemorySmsTransport {
    async fn send(&self, _netgsm: &NetgsmSettings, sms: &OutgoingSms) -> anyhow::Result<String> {
        if let Some(error) = &self.error {
            anyhow::bail!("{}", error);
        }
        self.sent.lock().unwrap().push(sms.clone());
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_provider_responses() {
        assert!(!is_netgsm_error("00 123456789"));
        assert!(!is_netgsm_error("20"));
        assert!(is_netgsm_error("30"));
        assert!(is_netgsm_error("40"));
        assert!(is_netgsm_error("50"));
        assert!(is_netgsm_error("70"));
    }

    #[test]
    fn request_body_carries_credentials_and_message() {
        let netgsm = NetgsmSettings {
            user: "salon".into(),
            password: "secret".into(),
            header: "SALONTAKIP".into(),
        };
        let sms = OutgoingSms {
            to: "5551234567".into(),
            message: "Sayın Ayşe Yılmaz, randevunuza 30 dakikadan az kaldı! (14:30)".into(),
        };

        let body = build_request_body(&netgsm, &sms);
        assert!(body.contains("<usercode>salon</usercode>"));
        assert!(body.contains("<msgheader>SALONTAKIP</msgheader>"));
        assert!(body.contains("<no>5551234567</no>"));
        assert!(body.contains("<![CDATA[Sayın Ayşe Yılmaz, randevunuza 30 dakikadan az kaldı! (14:30)]]>"));
    }
}
