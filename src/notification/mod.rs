//! # Notification
//!
//! Sends alert messages to an external webhook channel. Alerting is optional
//! infrastructure: when no webhook URL is configured the notifier degrades to
//! a local log warning, and any transport failure is surfaced as a
//! `NotificationError` for the caller to log and discard. The watcher never
//! depends on a delivery succeeding.

pub mod error;
mod webhook;

pub use error::NotificationError;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;

/// The seam between the detection engine and the alert transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatches one alert message. At-most-once: no retries are attempted.
    async fn send(&self, message: &str) -> Result<(), NotificationError>;
}
