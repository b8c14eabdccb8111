use std::time::Duration;

/// Bounded exponential backoff.
///
/// Yields the pause before each retry: `attempts - 1` delays, doubling
/// from `base` and capped at `cap`.
#[derive(Debug, Clone)]
pub struct Backoff {
    attempt: u32,
    attempts: u32,
    base: Duration,
    cap: Duration,
}

impl Backoff {
    pub fn new(attempts: u32, base: Duration, cap: Duration) -> Self {
        Self {
            attempt: 1,
            attempts,
            base,
            cap,
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(200), Duration::from_secs(5))
    }
}

impl Iterator for Backoff {
    type Item = Duration;
    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.attempts {
            return None;
        }
        let delay = self.base.saturating_mul(1 << (self.attempt - 1).min(16));
        self.attempt += 1;
        Some(delay.min(self.cap))
    }
}
