//! Sliding window of recent request outcomes.

use std::collections::VecDeque;

use crate::models;

/// A bounded FIFO of the last N observed status codes.
///
/// Eviction is an invariant of the container: `record` never lets the window
/// grow past its capacity, so no caller-side trimming exists.
#[derive(Debug)]
pub struct SlidingWindow {
    entries: VecDeque<String>,
    capacity: usize,
}

impl SlidingWindow {
    /// Creates an empty window holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends a status code, evicting the oldest entry once full. A
    /// capacity of zero is a disabled window and holds nothing.
    pub fn record(&mut self, status: String) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(status);
    }

    /// The error percentage over the window, or `None` while the window has
    /// not yet filled. The guard avoids false positives on startup when a
    /// handful of early failures would dominate a half-filled window.
    pub fn error_rate(&self) -> Option<f64> {
        if self.capacity == 0 || self.entries.len() < self.capacity {
            return None;
        }
        let errors = self.entries.iter().filter(|s| models::is_server_error(s)).count();
        Some((errors as f64 / self.capacity as f64) * 100.0)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(window: &mut SlidingWindow, statuses: &[&str]) {
        for s in statuses {
            window.record(s.to_string());
        }
    }

    #[test]
    fn no_rate_until_full() {
        let mut window = SlidingWindow::new(4);
        fill(&mut window, &["500", "500", "500"]);
        assert_eq!(window.error_rate(), None);

        window.record("500".to_string());
        assert_eq!(window.error_rate(), Some(100.0));
    }

    #[test]
    fn computes_error_percentage() {
        let mut window = SlidingWindow::new(4);
        fill(&mut window, &["200", "500", "500", "200"]);
        assert_eq!(window.error_rate(), Some(50.0));
    }

    #[test]
    fn evicts_oldest_first() {
        let mut window = SlidingWindow::new(3);
        fill(&mut window, &["500", "500", "500"]);
        assert_eq!(window.error_rate(), Some(100.0));

        // Three successes push the failures out entirely.
        fill(&mut window, &["200", "200", "200"]);
        assert_eq!(window.len(), 3);
        assert_eq!(window.error_rate(), Some(0.0));
    }

    #[test]
    fn zero_capacity_window_never_grows() {
        let mut window = SlidingWindow::new(0);
        for _ in 0..10 {
            window.record("500".to_string());
        }
        assert!(window.is_empty());
        assert_eq!(window.error_rate(), None);
    }

    #[test]
    fn non_5xx_statuses_are_not_errors() {
        let mut window = SlidingWindow::new(4);
        fill(&mut window, &["200", "404", "301", ""]);
        assert_eq!(window.error_rate(), Some(0.0));
    }
}
