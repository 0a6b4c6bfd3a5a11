//! The Watcher manages the lifecycle of the detection pipeline, wiring the
//! line source into the engine and handling orderly shutdown.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    engine::WatchEngine,
    notification::{NotificationError, Notifier, WebhookNotifier},
    tail::{LineSource, LogTailer, TailError},
};

/// WatcherError represents errors that can occur within the Watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// Error indicating that the Watcher is missing a configuration.
    #[error("Missing configuration for Watcher")]
    MissingConfig,

    /// Error from the log line ingestor. The only one raised at build time
    /// is a missing log file, which is a startup failure.
    #[error(transparent)]
    Tail(#[from] TailError),

    /// Error constructing the alert transport.
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// The WatcherBuilder is used to construct a Watcher instance with all
/// necessary components.
pub struct WatcherBuilder {
    config: Option<AppConfig>,
    line_source: Option<Box<dyn LineSource>>,
    notifier: Option<Arc<dyn Notifier>>,
}

/// The Watcher drives the sequential detection loop: one line is fully
/// processed (parse, window update, pool check, error check, possible alert)
/// before the next is read.
pub struct Watcher {
    line_source: Box<dyn LineSource>,
    engine: WatchEngine,
    cancellation_token: CancellationToken,
}

impl Watcher {
    /// Creates a new WatcherBuilder to configure and build a Watcher.
    pub fn builder() -> WatcherBuilder {
        WatcherBuilder::new()
    }

    /// A token that cancels the run loop when triggered, for wiring to an
    /// interrupt signal.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Runs the detection loop until cancelled. Waiting for a new log line
    /// may block indefinitely; absence of traffic is the intended idle
    /// state.
    pub async fn run(mut self) -> Result<(), WatcherError> {
        loop {
            tokio::select! {
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Shutdown requested, stopping log watcher.");
                    return Ok(());
                }
                line = self.line_source.next_line() => {
                    let line = line?;
                    self.engine.process_line(&line, Utc::now()).await;
                }
            }
        }
    }
}

impl WatcherBuilder {
    /// Creates a new WatcherBuilder instance.
    pub fn new() -> Self {
        Self { config: None, line_source: None, notifier: None }
    }

    /// Sets the configuration for the Watcher.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the log line source. Defaults to a `LogTailer` on the
    /// configured log file.
    pub fn line_source(mut self, line_source: Box<dyn LineSource>) -> Self {
        self.line_source = Some(line_source);
        self
    }

    /// Overrides the alert transport. Defaults to a `WebhookNotifier` on the
    /// configured webhook URL.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the Watcher, validating that required components are set. A
    /// missing log file fails here, before the loop starts.
    pub fn build(self) -> Result<Watcher, WatcherError> {
        let config = self.config.ok_or(WatcherError::MissingConfig)?;

        let line_source = match self.line_source {
            Some(source) => source,
            None => Box::new(LogTailer::new(&config.log_file, config.poll_interval_ms)?),
        };

        let notifier = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(WebhookNotifier::new(
                config.webhook_url.clone(),
                config.notify_timeout_secs,
            )?),
        };

        Ok(Watcher {
            engine: WatchEngine::new(&config, notifier),
            line_source,
            cancellation_token: CancellationToken::new(),
        })
    }
}

impl Default for WatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
