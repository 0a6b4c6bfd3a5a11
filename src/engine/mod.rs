//! The detection engine: sliding-window error-rate tracking, pool failover
//! detection, and the shared alert cooldown, driven one parsed log line at a
//! time.

pub mod cooldown;
pub mod failover;
pub mod window;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{config::AppConfig, models::AccessRecord, notification::Notifier};
use cooldown::AlertGate;
use failover::PoolTracker;
use window::SlidingWindow;

/// Renders a possibly-absent pool identifier for alert text.
fn display_pool(pool: &Option<String>) -> &str {
    pool.as_deref().unwrap_or("(none)")
}

/// Owns all mutable detection state for the process: the sliding window, the
/// tracked pool, and the cooldown clock. There is exactly one engine per
/// watcher and one logical thread of control, so no locking is involved.
pub struct WatchEngine {
    window: SlidingWindow,
    tracker: PoolTracker,
    gate: AlertGate,
    notifier: Arc<dyn Notifier>,
    threshold_percent: f64,
}

impl WatchEngine {
    /// Creates an engine from the application configuration and an alert
    /// transport.
    pub fn new(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            window: SlidingWindow::new(config.window_size),
            tracker: PoolTracker::new(),
            gate: AlertGate::new(config.alert_cooldown_secs),
            notifier,
            threshold_percent: config.error_rate_threshold,
        }
    }

    /// Processes one raw log line at time `now`.
    ///
    /// Malformed lines are skipped and touch no state; bad input in the log
    /// must never take the watcher down or skew detection.
    pub async fn process_line(&mut self, line: &str, now: DateTime<Utc>) {
        let record = match AccessRecord::parse(line) {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "Skipping unparseable log line.");
                return;
            }
        };
        self.process_record(record, now).await;
    }

    /// Feeds one parsed record through the pool check and the error-rate
    /// check, dispatching alerts as the cooldown gate permits.
    pub async fn process_record(&mut self, record: AccessRecord, now: DateTime<Utc>) {
        if let Some(event) = self.tracker.observe(record.pool.clone()) {
            tracing::info!(from = display_pool(&event.from), to = display_pool(&event.to), "Pool failover detected.");
            let message = format!(
                "Failover detected! Switched from {} to {}",
                display_pool(&event.from),
                display_pool(&event.to)
            );
            self.dispatch(&message, now).await;
        }

        self.window.record(record.status);

        if let Some(rate) = self.window.error_rate() {
            // Strictly greater than: a rate exactly at the limit is tolerated.
            if rate > self.threshold_percent {
                let message = format!(
                    "High error rate: {rate:.1}% (limit is {}%)",
                    self.threshold_percent
                );
                self.dispatch(&message, now).await;
            }
        }
    }

    /// Dispatches one alert if the shared cooldown permits. The cooldown
    /// clock advances once the attempt is made, whether or not the transport
    /// succeeded; a send failure is logged and otherwise discarded.
    async fn dispatch(&mut self, message: &str, now: DateTime<Utc>) {
        if !self.gate.permits(now) {
            tracing::debug!(alert = message, "Alert condition raised but cooldown is active.");
            return;
        }

        if let Err(error) = self.notifier.send(message).await {
            tracing::error!(%error, "Failed to send alert.");
        }
        self.gate.record_dispatch(now);
    }
}
