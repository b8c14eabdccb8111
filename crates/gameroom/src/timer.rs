use rtrp_core::*;
use std::time::Duration;
use tokio::time::Instant;

/// What a deadline wakes the dealer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// prompt the first seat after the deal pause
    Deal,
    /// the seat to act ran out of time
    Turn,
    /// deal again after the inter-hand pause
    Pause,
}

/// Configuration for table timeouts.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub decision: Duration,
    pub deal: Duration,
    pub pause: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            decision: Duration::from_secs(TURN_TIMEOUT),
            deal: Duration::from_millis(DEAL_PAUSE),
            pause: Duration::from_millis(HAND_PAUSE),
        }
    }
}

/// Single pending deadline for a table.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<(Instant, Wake)>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }
    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }
    pub fn start_decision(&mut self) {
        self.deadline = Some((Instant::now() + self.config.decision, Wake::Turn));
    }
    pub fn start_deal(&mut self) {
        self.deadline = Some((Instant::now() + self.config.deal, Wake::Deal));
    }
    pub fn start_pause(&mut self) {
        self.deadline = Some((Instant::now() + self.config.pause, Wake::Pause));
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.map(|(d, _)| d)
    }
    pub fn wake(&self) -> Option<Wake> {
        self.deadline.map(|(_, w)| w)
    }
    pub fn expired(&self) -> bool {
        self.deadline().map(|d| Instant::now() >= d).unwrap_or(false)
    }
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
    pub fn decision_timeout(&self) -> Duration {
        self.config.decision
    }
}
