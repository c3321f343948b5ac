//! Completion rate limiting over a rolling window
//!
//! A sliding time-window gate shared by all download workers. Only
//! successful completions register, so throttling pressure scales with
//! actual throughput rather than attempted throughput.

use std::collections::VecDeque;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::warn;

use super::config::RATE_WINDOW;

/// Caps registered completions per rolling window.
///
/// Tracks the most recent `limit` completion instants in a bounded FIFO.
/// Registering while the window is full and spanning less than the window
/// duration blocks the caller for the remaining time. An absent or zero
/// limit turns the gate into a no-op.
pub struct RateLimiter {
    state: Option<Mutex<VecDeque<Instant>>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// Create a per-minute limiter; `None` or `Some(0)` disables it.
    pub fn per_minute(limit: Option<usize>) -> Self {
        Self::new(limit, RATE_WINDOW)
    }

    /// Create a limiter with an explicit rolling window.
    pub fn new(limit: Option<usize>, window: Duration) -> Self {
        match limit {
            Some(limit) if limit > 0 => Self {
                state: Some(Mutex::new(VecDeque::with_capacity(limit))),
                limit,
                window,
            },
            _ => Self {
                state: None,
                limit: 0,
                window,
            },
        }
    }

    /// Whether a limit is configured.
    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Register a successful completion, waiting for window capacity first.
    ///
    /// The window lock is held across any wait so update-and-wait is
    /// atomic with respect to other workers: nobody observes a stale
    /// window mid-update.
    pub async fn register_completion(&self) {
        let Some(state) = &self.state else {
            return;
        };

        let mut window = state.lock().await;
        if window.len() == self.limit {
            if let Some(oldest) = window.front() {
                let span = oldest.elapsed();
                if span < self.window {
                    let wait = self.window - span;
                    warn!(
                        wait_secs = wait.as_secs_f64(),
                        limit = self.limit,
                        "rate limit reached; waiting for window to clear"
                    );
                    sleep(wait).await;
                }
            }
        }

        window.push_back(Instant::now());
        if window.len() > self.limit {
            window.pop_front();
        }
    }
}
