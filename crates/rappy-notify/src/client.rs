use std::time::Duration;

use rappy_core::DeliveryError;
use rappy_core::notification::Notification;
use rappy_core::ports::{Ack, Notifier};

use crate::payload::WebhookPayload;

#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Every request is bounded by `timeout`
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    async fn post(&self, payload: &WebhookPayload) -> Result<Ack, DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(Ack {
                status: status.as_u16(),
            })
        } else {
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<Ack, DeliveryError> {
        let ack = self.post(&WebhookPayload::from(notification)).await?;
        tracing::debug!(status = ack.status, title = %notification.title, "Webhook delivered");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn notifier(url: String) -> WebhookNotifier {
        WebhookNotifier::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_notify_posts_embed_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "embeds": [{
                    "color": 0xD5BED9,
                    "title": "Currently in PSE Chance state.",
                    "footer": { "text": "Coins: 42" }
                }]
            })))
            .with_status(204)
            .create_async()
            .await;

        let notification = Notification::new(0xD5BED9, "Currently in PSE Chance state.")
            .with_footer(Some("Coins: 42".into()));
        let ack = notifier(format!("{}/hook", server.url()))
            .notify(&notification)
            .await
            .unwrap();

        assert_eq!(ack.status, 204);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(429)
            .create_async()
            .await;

        let result = notifier(format!("{}/hook", server.url()))
            .notify(&Notification::failsafe())
            .await;

        assert!(matches!(result, Err(DeliveryError::Rejected { status: 429 })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let result = notifier("http://127.0.0.1:9/hook".to_string())
            .notify(&Notification::failsafe())
            .await;

        assert!(matches!(
            result,
            Err(DeliveryError::Transport(_) | DeliveryError::Timeout)
        ));
    }
}
