//! Retry budget and the wait between attempts.
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { attempts: 3 } }
}

/// Pause between attempts. `attempt` is the 1-based attempt that just failed.
pub trait Backoff: Send + Sync {
    fn delay(&self, attempt: u32) -> Duration;

    fn wait(&self, attempt: u32) {
        let delay = self.delay(attempt);
        if !delay.is_zero() { std::thread::sleep(delay); }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self { Self(Duration::from_secs(5)) }
}

impl Backoff for FixedDelay {
    fn delay(&self, _attempt: u32) -> Duration { self.0 }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Backoff for NoDelay {
    fn delay(&self, _attempt: u32) -> Duration { Duration::ZERO }
}
