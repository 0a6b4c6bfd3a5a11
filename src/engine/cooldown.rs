//! Shared alert cooldown.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Gatekeeper enforcing a single cooldown across every alert type.
///
/// Failover and error-rate alerts share one clock: while either is inside
/// the cooldown interval, both are suppressed. This conflates two logically
/// independent alert streams and is kept that way on purpose, matching the
/// behavior operators already depend on.
#[derive(Debug)]
pub struct AlertGate {
    cooldown: Duration,
    last_alert: Option<DateTime<Utc>>,
}

impl AlertGate {
    /// Creates a gate with the given cooldown and no alert history.
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, last_alert: None }
    }

    /// Whether an alert may be dispatched at `now`. Permission is granted
    /// when no alert has ever fired, or strictly more than the cooldown has
    /// elapsed since the last one.
    pub fn permits(&self, now: DateTime<Utc>) -> bool {
        match self.last_alert {
            None => true,
            Some(last) => now > last + self.cooldown,
        }
    }

    /// Advances the cooldown clock. Called once a dispatch is attempted,
    /// whether or not the transport confirmed delivery, so a failing
    /// transport cannot cause an alert storm.
    pub fn record_dispatch(&mut self, now: DateTime<Utc>) {
        self.last_alert = Some(now);
    }
}
