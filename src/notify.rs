use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::alert::AlertEvent;
use crate::config::Webhook;

/// Forwards alert events to a webhook
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    webhook: Webhook,
}

impl Notifier {
    pub fn new(webhook: Webhook, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build webhook client")?;

        Ok(Self { client, webhook })
    }

    /// POST the event; delivery failures are logged, never returned
    #[instrument(skip_all, fields(target = %event.target, kind = %event.kind))]
    pub async fn notify(&self, event: &AlertEvent) {
        let payload = json!({
            "message": event.message,
            "target": event.target,
            "kind": event.kind,
            "availability": event.availability,
            "timestamp": event.timestamp.to_rfc3339()
        });

        match self.client.post(&self.webhook.url).json(&payload).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!("Successfully sent webhook alert");
                } else {
                    error!("Webhook alert failed with status: {}", response.status());
                }
            }
            Err(e) => {
                error!("Failed to send webhook alert: {}", e);
            }
        }
    }
}
