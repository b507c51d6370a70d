//! Exponential backoff for transient fetch failures.

use std::time::Duration;

use tracing::warn;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            max_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.multiplier.saturating_mul(factor).min(self.max_wait)
    }
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
pub fn retry_with<T>(
    policy: &RetryPolicy,
    mut sleep: impl FnMut(Duration),
    mut operation: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() && attempt < policy.max_attempts => {
                let wait = policy.backoff(attempt);
                warn!(attempt, wait_ms = wait.as_millis() as u64, %error, "transient fetch error, retrying");
                sleep(wait);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::cell::Cell;

    fn unavailable() -> FetchError {
        FetchError::Api {
            code: 503,
            status: "UNAVAILABLE".to_string(),
            message: "backend unavailable".to_string(),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
        assert_eq!(policy.backoff(4), Duration::from_secs(10));
    }

    #[test]
    fn retries_transient_errors_until_success() {
        let calls = Cell::new(0);
        let mut waits = Vec::new();
        let value = retry_with(
            &RetryPolicy::default(),
            |wait| waits.push(wait),
            || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(unavailable())
                } else {
                    Ok(42)
                }
            },
        )
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(calls.get(), 3);
        assert_eq!(waits, vec![Duration::from_secs(2), Duration::from_secs(4)]);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<()> = retry_with(
            &RetryPolicy::default(),
            |_| {},
            || {
                calls.set(calls.get() + 1);
                Err(unavailable())
            },
        );
        assert!(matches!(result, Err(FetchError::Api { code: 503, .. })));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = retry_with(
            &RetryPolicy::default(),
            |_| {},
            || {
                calls.set(calls.get() + 1);
                Err(FetchError::SpreadsheetNotFound("key".to_string()))
            },
        );
        assert!(matches!(result, Err(FetchError::SpreadsheetNotFound(_))));
        assert_eq!(calls.get(), 1);
    }
}
