//! WhatsApp channel backed by the Twilio Messages API.

use async_trait::async_trait;
use reqwest::Client;

use super::{ChannelError, NotificationChannel};
use crate::core::WhatsAppConfig;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: Client,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    // WhatsApp messages have no subject line; the body carries everything.
    async fn send(&self, _subject: &str, body: &str) -> Result<(), ChannelError> {
        let params = [
            ("From", self.config.from.as_str()),
            ("To", self.config.to.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
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
