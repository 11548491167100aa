pub mod email;
pub mod format;
pub mod whatsapp;

pub use email::EmailChannel;
pub use whatsapp::WhatsAppChannel;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, error};

use crate::api::Listing;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("channel rejected message: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// An independent notification transport. Implementations are
/// fire-and-forget per call and hold no state across listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, subject: &str, body: &str) -> Result<(), ChannelError>;
}

/// Fans one alert out to every configured channel. A failing channel is
/// logged and reported back; it never prevents the other channels from
/// being attempted and never surfaces as an error to the caller.
pub struct Dispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|channel| channel.name()).collect()
    }

    /// Format the alert once and send it through every channel
    /// concurrently. Returns the per-channel failures.
    pub async fn notify(&self, listing: &Listing) -> Vec<(&'static str, ChannelError)> {
        let subject = format::alert_subject();
        let body = format::alert_body(listing);

        let sends = self.channels.iter().map(|channel| {
            let subject = &subject;
            let body = &body;
            async move { (channel.name(), channel.send(subject, body).await) }
        });

        let mut failures = Vec::new();
        for (name, result) in join_all(sends).await {
            match result {
                Ok(()) => debug!("alert for {} delivered via {}", listing.id, name),
                Err(e) => {
                    error!("alert for {} failed via {}: {}", listing.id, name, e);
                    failures.push((name, e));
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate;

    fn listing() -> Listing {
        Listing {
            id: "xyz789".to_string(),
            price: Some(4000),
            rooms: Some(3.0),
            street: Some("Main".to_string()),
        }
    }

    fn failing_channel(name: &'static str) -> MockNotificationChannel {
        let mut channel = MockNotificationChannel::new();
        channel.expect_name().return_const(name);
        channel.expect_send().times(1).returning(|_, _| {
            Err(ChannelError::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "bad credentials".to_string(),
            })
        });
        channel
    }

    #[tokio::test]
    async fn every_channel_receives_the_formatted_alert() {
        let mut whatsapp = MockNotificationChannel::new();
        whatsapp.expect_name().return_const("whatsapp");
        whatsapp
            .expect_send()
            .times(1)
            .with(
                predicate::always(),
                predicate::function(|body: &str| body.contains("Main") && body.contains("4000")),
            )
            .returning(|_, _| Ok(()));

        let mut email = MockNotificationChannel::new();
        email.expect_name().return_const("email");
        email.expect_send().times(1).returning(|_, _| Ok(()));

        let dispatcher = Dispatcher::new(vec![Box::new(whatsapp), Box::new(email)]);
        let failures = dispatcher.notify(&listing()).await;
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn one_failing_channel_does_not_suppress_the_other() {
        let mut email = MockNotificationChannel::new();
        email.expect_name().return_const("email");
        email
            .expect_send()
            .times(1)
            .with(
                predicate::always(),
                predicate::function(|body: &str| body.contains("Main")),
            )
            .returning(|_, _| Ok(()));

        let dispatcher = Dispatcher::new(vec![Box::new(failing_channel("whatsapp")), Box::new(email)]);
        let failures = dispatcher.notify(&listing()).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "whatsapp");
    }

    #[tokio::test]
    async fn all_channels_failing_is_still_not_an_error() {
        let dispatcher = Dispatcher::new(vec![
            Box::new(failing_channel("whatsapp")),
            Box::new(failing_channel("email")),
        ]);
        assert_eq!(dispatcher.notify(&listing()).await.len(), 2);
    }

    #[tokio::test]
    async fn an_empty_dispatcher_is_a_no_op() {
        let dispatcher = Dispatcher::new(Vec::new());
        assert!(dispatcher.is_empty());
        assert!(dispatcher.notify(&listing()).await.is_empty());
    }
}
