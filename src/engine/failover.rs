//! Upstream pool failover detection.

/// Tracking state for the active upstream pool.
///
/// A missing pool identifier in the log is an ordinary observable value, so
/// the tracked value is itself an `Option`; the outer state distinguishes
/// "nothing observed yet" from "tracking a (possibly absent) pool".
#[derive(Debug, Clone, PartialEq)]
enum PoolState {
    Uninitialized,
    Tracking(Option<String>),
}

/// An observed change of the active upstream pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FailoverEvent {
    /// The pool that was serving traffic before the change.
    pub from: Option<String>,
    /// The pool now serving traffic.
    pub to: Option<String>,
}

/// Detects transitions of the active upstream pool between consecutive
/// requests.
#[derive(Debug)]
pub struct PoolTracker {
    state: PoolState,
}

impl PoolTracker {
    /// Creates a tracker with no baseline established.
    pub fn new() -> Self {
        Self { state: PoolState::Uninitialized }
    }

    /// Feeds one observation. The first observation establishes the baseline
    /// and never yields an event. On a change, the tracked value advances
    /// unconditionally so the same transition is not re-detected while an
    /// alert is suppressed by cooldown.
    pub fn observe(&mut self, pool: Option<String>) -> Option<FailoverEvent> {
        match &self.state {
            PoolState::Uninitialized => {
                self.state = PoolState::Tracking(pool);
                None
            }
            PoolState::Tracking(current) if *current == pool => None,
            PoolState::Tracking(current) => {
                let event = FailoverEvent { from: current.clone(), to: pool.clone() };
                self.state = PoolState::Tracking(pool);
                Some(event)
            }
        }
    }
}

impl Default for PoolTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe(tracker: &mut PoolTracker, pool: &str) -> Option<FailoverEvent> {
        tracker.observe(Some(pool.to_string()))
    }

    #[test]
    fn first_observation_sets_baseline_silently() {
        let mut tracker = PoolTracker::new();
        assert_eq!(observe(&mut tracker, "a"), None);
        assert_eq!(observe(&mut tracker, "a"), None);
    }

    #[test]
    fn detects_each_transition_once() {
        let mut tracker = PoolTracker::new();
        let events: Vec<_> =
            ["a", "a", "b", "b", "a"].iter().map(|p| observe(&mut tracker, p)).collect();

        assert_eq!(events[0], None);
        assert_eq!(events[1], None);
        assert_eq!(
            events[2],
            Some(FailoverEvent { from: Some("a".into()), to: Some("b".into()) })
        );
        assert_eq!(events[3], None);
        assert_eq!(
            events[4],
            Some(FailoverEvent { from: Some("b".into()), to: Some("a".into()) })
        );
    }

    #[test]
    fn missing_pool_is_a_valid_baseline() {
        let mut tracker = PoolTracker::new();
        assert_eq!(tracker.observe(None), None);

        // null -> value is a real transition once the baseline exists.
        let event = observe(&mut tracker, "a").unwrap();
        assert_eq!(event.from, None);
        assert_eq!(event.to, Some("a".into()));
    }

    #[test]
    fn value_to_missing_is_a_transition() {
        let mut tracker = PoolTracker::new();
        observe(&mut tracker, "a");
        let event = tracker.observe(None).unwrap();
        assert_eq!(event.from, Some("a".into()));
        assert_eq!(event.to, None);
    }
}
