use crate::{Alert, AlertKind, Result};
use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

const POST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// A pre-provisioned Discord channel webhook
#[derive(Clone)]
pub struct Webhook {
    client: reqwest::Client,
    url: String,
}

impl Webhook {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub async fn send(&self, content: &str) -> Result<()> {
        self.client
            .post(&self.url)
            .timeout(POST_TIMEOUT)
            .json(&WebhookMessage { content })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Routes alerts to their webhook. Delivery failures are logged, never returned.
#[derive(Clone)]
pub struct Notifier {
    price: Webhook,
    average: Option<Webhook>,
}

impl Notifier {
    pub fn new(price: Webhook, average: Option<Webhook>) -> Self {
        Self { price, average }
    }

    /// Returns whether the alert was delivered.
    pub async fn notify(&self, alert: &Alert) -> bool {
        let webhook = match alert.kind {
            AlertKind::PriceMove => &self.price,
            AlertKind::WindowAverage { .. } => match &self.average {
                Some(webhook) => webhook,
                None => {
                    info!("Average alert webhook not set, skipping alert for {}", alert.item);
                    return false;
                }
            },
        };

        match webhook.send(&alert.to_string()).await {
            Ok(()) => {
                info!("Sent {:?} alert for {}", alert.kind, alert.item);
                true
            }
            Err(e) => {
                warn!("Failed to send {:?} alert for {}: {e}", alert.kind, alert.item);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, PriceChange};

    #[test]
    fn test_payload() {
        let body = serde_json::to_value(WebhookMessage { content: "▲ hi" }).unwrap();
        assert_eq!(body, serde_json::json!({"content": "▲ hi"}));
    }

    #[tokio::test]
    async fn test_missing_average_webhook_skips() {
        let client = reqwest::Client::new();
        let notifier = Notifier::new(Webhook::new(client, "http://127.0.0.1:9/hook"), None);
        let alert = Alert {
            kind: AlertKind::WindowAverage { hours: 3 },
            item: "Revolution Case".to_string(),
            change: PriceChange::new(100.0, 110.0),
            currency: Currency {
                id: 24,
                symbol: "₹".to_string(),
                code: "INR".to_string(),
            },
        };

        assert!(!notifier.notify(&alert).await);
    }
}
