//! Retry policy for downloads
//!
//! Each attempt moves the transfer through:
//!
//! ```text
//! Attempting(n) -> Succeeded
//!               -> Aborted            (resource not found)
//!               -> Retrying(n+1)      (transient failure, attempts left)
//!               -> Exhausted          (transient failure, none left)
//! ```
//!
//! The wait before attempt `n+1` is `base_delay * 2^(n-1)`.

use std::time::Duration;

/// How one transfer attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    NotFound,
    Transient,
}

/// Where the transfer goes after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// Attempt number `n` (1-based) is in flight.
    Attempting(u32),
    Retrying { next: u32, delay: Duration },
    Succeeded,
    Exhausted,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exp)
    }

    /// Transition out of `Attempting(attempt)` given how it ended.
    pub fn next(&self, attempt: u32, result: AttemptResult) -> AttemptState {
        match result {
            AttemptResult::Success => AttemptState::Succeeded,
            AttemptResult::NotFound => AttemptState::Aborted,
            AttemptResult::Transient if attempt >= self.max_attempts => AttemptState::Exhausted,
            AttemptResult::Transient => AttemptState::Retrying {
                next: attempt + 1,
                delay: self.delay_after(attempt),
            },
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
