//! Email channel backed by the Brevo transactional API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{ChannelError, NotificationChannel};
use crate::core::EmailConfig;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    text_content: &'a str,
}

pub struct EmailChannel {
    config: EmailConfig,
    client: Client,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn payload<'a>(&'a self, subject: &'a str, body: &'a str) -> BrevoPayload<'a> {
        BrevoPayload {
            sender: BrevoSender {
                name: &self.config.sender_name,
                email: &self.config.sender_address,
            },
            to: self
                .config
                .recipients
                .iter()
                .map(|address| BrevoRecipient { email: address })
                .collect(),
            subject,
            text_content: body,
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.config.api_key)
            .json(&self.payload(subject, body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::Api { status, body });
        }

        Ok(())
    }
}
