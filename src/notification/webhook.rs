//! Webhook notification implementation.
//!
//! Posts alert text to a Slack-compatible incoming webhook as a JSON
//! `{"text": ...}` payload, with a bounded timeout on each attempt.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use url::Url;

use super::{Notifier, error::NotificationError};

/// Decoration prepended to every outbound alert message.
const ALERT_PREFIX: &str = ":rotating_light: ";

/// Sends alerts to a configured webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    /// Webhook URL for message delivery; `None` degrades to log-only.
    url: Option<Url>,
    /// HTTP client with the dispatch timeout applied.
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Creates a new webhook notifier.
    ///
    /// # Arguments
    /// * `url` - Target webhook URL, if one is configured
    /// * `timeout` - Bound on a single dispatch attempt
    pub fn new(url: Option<Url>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let Some(url) = &self.url else {
            tracing::warn!(alert = message, "No webhook URL configured, alert not dispatched.");
            return Ok(());
        };

        let payload = json!({ "text": format!("{ALERT_PREFIX}{message}") });
        let response = self.client.post(url.clone()).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::NotifyFailed(format!(
                "Webhook request failed with status: {status}"
            )));
        }

        Ok(())
    }
}
