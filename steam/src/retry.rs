use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 6;
const RATE_LIMIT_BASE: u32 = 2;

/// A failed attempt that is worth sending again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The request never produced a response (connect error, timeout)
    Transport,
    RateLimited,
    Server(StatusCode),
}

impl Failure {
    /// Returns `None` for statuses that should fail without another attempt.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Some(Self::RateLimited)
        } else if status.is_server_error() {
            Some(Self::Server(status))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// First wait after a transport or server failure, doubled each time
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn backoff(&self) -> Backoff<'_> {
        Backoff {
            policy: self,
            attempt: 0,
            delay: self.base_delay,
        }
    }
}

/// Tracks the attempts of a single request.
pub struct Backoff<'a> {
    policy: &'a RetryPolicy,
    attempt: u32,
    delay: Duration,
}

impl Backoff<'_> {
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Records a failed attempt and returns how long to wait before the next one,
    /// or `None` once every attempt has been used.
    ///
    /// Rate limiting waits `2^attempt` base delays. Transport and server failures share
    /// a delay that starts at the base delay and doubles after each use.
    pub fn next(&mut self, failure: Failure) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.policy.max_attempts {
            return None;
        }

        match failure {
            Failure::RateLimited => {
                Some(self.policy.base_delay * RATE_LIMIT_BASE.saturating_pow(self.attempt))
            }
            Failure::Transport | Failure::Server(_) => {
                let wait = self.delay;
                self.delay *= 2;
                Some(wait)
            }
        }
    }
}
