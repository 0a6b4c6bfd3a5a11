use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use url::Url;

use super::{deserialize_duration_from_ms, deserialize_duration_from_seconds};

/// Provides the default value for log_file.
fn default_log_file() -> PathBuf {
    PathBuf::from("/var/log/nginx/access.log")
}

/// Provides the default value for error_rate_threshold.
fn default_error_rate_threshold() -> f64 {
    2.0
}

/// Provides the default value for window_size.
fn default_window_size() -> usize {
    200
}

/// Provides the default value for alert_cooldown_secs.
fn default_alert_cooldown() -> Duration {
    Duration::from_secs(300)
}

/// Provides the default value for poll_interval_ms.
fn default_poll_interval() -> Duration {
    Duration::from_millis(500)
}

/// Provides the default value for notify_timeout_secs.
fn default_notify_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Application configuration for poolwatch.
///
/// Read once at startup from `POOLWATCH_`-prefixed environment variables and
/// immutable for the process lifetime.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Path of the access log to follow.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Webhook URL for outbound alerts. Absent means alerts degrade to
    /// local logging only.
    #[serde(default)]
    pub webhook_url: Option<Url>,

    /// Error-rate alert threshold, as a percentage of the window.
    #[serde(default = "default_error_rate_threshold")]
    pub error_rate_threshold: f64,

    /// Number of most recent requests held in the sliding window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Minimum elapsed time between two dispatched alerts, shared across
    /// alert types.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_alert_cooldown"
    )]
    pub alert_cooldown_secs: Duration,

    /// The interval to poll the log file for appended data.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_poll_interval"
    )]
    pub poll_interval_ms: Duration,

    /// Bound on a single webhook dispatch attempt.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_notify_timeout"
    )]
    pub notify_timeout_secs: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            webhook_url: None,
            error_rate_threshold: default_error_rate_threshold(),
            window_size: default_window_size(),
            alert_cooldown_secs: default_alert_cooldown(),
            poll_interval_ms: default_poll_interval(),
            notify_timeout_secs: default_notify_timeout(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` from the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Environment::with_prefix("POOLWATCH").try_parsing(true))
            .build()?;
        s.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// A builder for creating `AppConfig` instances for testing.
#[cfg(test)]
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn log_file(mut self, path: &str) -> Self {
        self.config.log_file = path.into();
        self
    }

    pub fn webhook_url(mut self, url: Url) -> Self {
        self.config.webhook_url = Some(url);
        self
    }

    pub fn error_rate_threshold(mut self, percent: f64) -> Self {
        self.config.error_rate_threshold = percent;
        self
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    pub fn alert_cooldown(mut self, cooldown: Duration) -> Self {
        self.config.alert_cooldown_secs = cooldown;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = interval;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
