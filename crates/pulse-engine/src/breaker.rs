//! Per-source circuit breaker.
//!
//! After `threshold` consecutive failures the breaker opens and calls are
//! refused for `cooldown`. Once the cooldown elapses one trial call is let
//! through and every other caller is refused until it reports; a success
//! closes the breaker, a failure re-opens it. A trial that never reports
//! (its caller was cancelled) is abandoned after [`TRIAL_TIMEOUT`] or the
//! cooldown, whichever is longer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

pub const TRIAL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct BreakerWindow {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_started_at: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    state: Arc<Mutex<BreakerWindow>>,
}

impl CircuitBreaker {
    /// A `threshold` of zero is treated as one.
    #[must_use]
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            cooldown,
            state: Arc::new(Mutex::new(BreakerWindow {
                consecutive_failures: 0,
                opened_at: None,
                trial_started_at: None,
            })),
        }
    }

    /// Whether a call may proceed right now.
    pub async fn allow(&self) -> bool {
        let mut window = self.state.lock().await;
        if let Some(started) = window.trial_started_at {
            if started.elapsed() < self.cooldown.max(TRIAL_TIMEOUT) {
                return false;
            }
            // abandoned trial: count it as a failure and re-open
            window.trial_started_at = None;
            window.consecutive_failures = self.threshold;
            window.opened_at = Some(Instant::now());
        }

        match window.opened_at {
            None => true,
            Some(opened_at) if opened_at.elapsed() >= self.cooldown => {
                // half-open: one more failure re-opens immediately
                window.opened_at = None;
                window.consecutive_failures = self.threshold - 1;
                window.trial_started_at = Some(Instant::now());
                true
            }
            Some(_) => false,
        }
    }

    pub async fn record_success(&self) {
        let mut window = self.state.lock().await;
        window.consecutive_failures = 0;
        window.opened_at = None;
        window.trial_started_at = None;
    }

    /// Returns `true` when this failure opened the breaker.
    pub async fn record_failure(&self) -> bool {
        let mut window = self.state.lock().await;
        window.trial_started_at = None;
        window.consecutive_failures = window.consecutive_failures.saturating_add(1);
        if window.opened_at.is_none() && window.consecutive_failures >= self.threshold {
            window.opened_at = Some(Instant::now());
            return true;
        }
        false
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.opened_at.is_some()
    }
}
