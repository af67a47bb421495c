//! Retry logic.
//!
//! # Responsibilities
//! - Re-run a fallible async operation a bounded number of times
//! - Wait a fixed delay between attempts
//! - Report whether the operation eventually succeeded or ran out of attempts
//!
//! # Design Decisions
//! - Fixed delay, no jitter: the store either comes up or it doesn't
//! - No sleep after the final failed attempt
//! - Every error is retryable; callers decide what exhaustion means

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// A bounded retry policy with a constant delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl FixedDelay {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }
}

/// Result of running an operation under a retry policy.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { last_error: Option<E>, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Succeeded { .. })
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached.
///
/// `label` names the operation in log lines.
pub async fn retry_fixed<T, E, F, Fut>(label: &str, policy: FixedDelay, mut op: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome::Succeeded {
                    value,
                    attempts: attempt,
                }
            }
            Err(e) => {
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Attempt {}/{} failed", attempt, policy.max_attempts
                );
                last_error = Some(e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    RetryOutcome::Exhausted {
        last_error,
        attempts: policy.max_attempts,
    }
}
