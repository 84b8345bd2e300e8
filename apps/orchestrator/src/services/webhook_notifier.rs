//! Outbound webhook delivery for alert notifications and rollups.

use async_trait::async_trait;
use mdm_domain::alert::{AlertNotification, AlertRollup};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{instrument, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook endpoint rejected the notification: {0}")]
    Rejected(String),
    #[error("webhook endpoint unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, notification: &AlertNotification) -> Result<(), NotifyError>;
    async fn notify_rollup(&self, rollup: &AlertRollup) -> Result<(), NotifyError>;
}

pub struct HttpWebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpWebhookNotifier {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn post(&self, body: &serde_json::Value) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| NotifyError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(response.status().to_string()))
        }
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    #[instrument(skip(self, notification))]
    async fn notify(&self, notification: &AlertNotification) -> Result<(), NotifyError> {
        self.post(&serde_json::to_value(notification).unwrap_or_default()).await
    }

    #[instrument(skip(self, rollup))]
    async fn notify_rollup(&self, rollup: &AlertRollup) -> Result<(), NotifyError> {
        self.post(&serde_json::to_value(rollup).unwrap_or_default()).await
    }
}

/// No-op notifier used when `WEBHOOK_URL` is unset; logs instead of
/// silently discarding so an operator can tell alerting is configured
/// without an outbound destination.
pub struct NullWebhookNotifier;

#[async_trait]
impl WebhookNotifier for NullWebhookNotifier {
    async fn notify(&self, notification: &AlertNotification) -> Result<(), NotifyError> {
        warn!(?notification, "no webhook configured, dropping alert notification");
        Ok(())
    }

    async fn notify_rollup(&self, rollup: &AlertRollup) -> Result<(), NotifyError> {
        warn!(?rollup, "no webhook configured, dropping alert rollup");
        Ok(())
    }
}

pub struct FakeWebhookNotifier {
    pub notifications: Mutex<Vec<AlertNotification>>,
    pub rollups: Mutex<Vec<AlertRollup>>,
}

impl FakeWebhookNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            rollups: Mutex::new(Vec::new()),
        }
    }
}

impl Default for FakeWebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookNotifier for FakeWebhookNotifier {
    async fn notify(&self, notification: &AlertNotification) -> Result<(), NotifyError> {
        self.notifications
            .lock()
            .expect("fake webhook notifier lock poisoned")
            .push(notification.clone());
        Ok(())
    }

    async fn notify_rollup(&self, rollup: &AlertRollup) -> Result<(), NotifyError> {
        self.rollups
            .lock()
            .expect("fake webhook notifier lock poisoned")
            .push(rollup.clone());
        Ok(())
    }
}
