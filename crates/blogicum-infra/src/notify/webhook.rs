//! Webhook delivery: one JSON POST per notification.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use blogicum_core::ports::{Notification, Notifier, NotifyError};

/// Webhook target and envelope.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub from: String,
    pub recipients: Vec<String>,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            from: "publicat_form@blogicum.not".to_string(),
            recipients: vec!["admin@blogicum.not".to_string()],
            timeout: Duration::from_secs(5),
        }
    }

    /// `None` unless `NOTIFY_WEBHOOK_URL` is set.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("NOTIFY_WEBHOOK_URL").ok()?;
        let mut config = Self::new(url);

        if let Ok(from) = std::env::var("NOTIFY_FROM") {
            config.from = from;
        }
        if let Ok(recipients) = std::env::var("NOTIFY_RECIPIENTS") {
            config.recipients = parse_recipients(&recipients);
        }
        if let Some(secs) = std::env::var("NOTIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        Some(config)
    }
}

fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Serialize)]
struct Payload<'a> {
    from: &'a str,
    recipients: &'a [String],
    subject: &'a str,
    message: &'a str,
}

pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let payload = Payload {
            from: &self.config.from,
            recipients: &self.config.recipients,
            subject: &notification.subject,
            message: &notification.message,
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::debug!(subject = %notification.subject, "Notification delivered");
        Ok(())
    }
}
