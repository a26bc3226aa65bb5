use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::prelude::*;

/// Outcome history of a periodically polled feed.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure: Option<Failure>,
    pub n_consecutive_failures: u32,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub at: DateTime<Utc>,
    pub error: String,
}

impl PollStatus {
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_success_at = Some(at);
        self.n_consecutive_failures = 0;
    }

    pub fn record_failure(&mut self, at: DateTime<Utc>, error: &Error) {
        self.last_failure = Some(Failure { at, error: format!("{error:#}") });
        self.n_consecutive_failures = self.n_consecutive_failures.saturating_add(1);
    }

    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.n_consecutive_failures == 0
    }
}

/// Polling period with exponential backoff on consecutive failures.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub period: Duration,

    /// Upper bound of the backoff delay, never below the period.
    pub max_delay: Duration,
}

impl PollPolicy {
    /// Delay before the next poll: `period · 2ⁿ` after `n` consecutive failures, capped.
    #[must_use]
    pub fn next_delay(&self, status: &PollStatus) -> Duration {
        let max_delay = self.max_delay.max(self.period);
        let factor = 1_u32.checked_shl(status.n_consecutive_failures).unwrap_or(u32::MAX);
        self.period.checked_mul(factor).map_or(max_delay, |delay| delay.min(max_delay))
    }
}
