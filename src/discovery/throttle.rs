//! Throttle detection over a bounded error-timestamp window
//!
//! Catalog pagination records a timestamp for every throttling signal
//! (HTTP 403/429). When the window is full and its oldest and newest
//! entries lie close together, the upstream is considered to be actively
//! throttling and a cooldown is due.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Bounded, time-ordered window of recent throttle-signal timestamps.
///
/// Invariant: the window never holds more than `capacity` entries and the
/// oldest entry is always at the front.
#[derive(Debug)]
pub struct ThrottleWindow {
    events: VecDeque<Instant>,
    capacity: usize,
    span_threshold: Duration,
}

impl ThrottleWindow {
    /// Signals kept before throttling can be declared.
    pub const DEFAULT_CAPACITY: usize = 5;

    /// A full window spanning less than this means active throttling.
    pub const DEFAULT_SPAN_THRESHOLD: Duration = Duration::from_secs(30);

    /// Create a window with explicit capacity and span threshold.
    pub fn new(capacity: usize, span_threshold: Duration) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            span_threshold,
        }
    }

    /// Record a throttling signal observed at `at`, evicting the oldest
    /// entry if the window is at capacity.
    pub fn record(&mut self, at: Instant) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(at);
    }

    /// Whether the window is full and its span is under the threshold.
    pub fn cooldown_due(&self) -> bool {
        if self.events.len() < self.capacity {
            return false;
        }
        match (self.events.front(), self.events.back()) {
            (Some(oldest), Some(newest)) => {
                newest.saturating_duration_since(*oldest) < self.span_threshold
            }
            _ => false,
        }
    }

    /// Drop all recorded signals (called after a cooldown completes).
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of recorded signals.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no signals are recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for ThrottleWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_SPAN_THRESHOLD)
    }
}
