//! Retry with exponential backoff for transient storefront failures.
//!
//! Queries retry HTTP 429, GraphQL `THROTTLED` responses and network
//! failures. Cart mutations retry throttling only: a timed-out or dropped
//! response may belong to a mutation the platform already applied.
//! Everything else (unknown handles, user errors, bad payloads) is returned
//! on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

/// Which failures an operation may be re-sent after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryPolicy {
    /// Read-only operations: throttling and network failures.
    Idempotent,
    /// Mutations: throttling only, which the platform rejects unapplied.
    ThrottledOnly,
}

impl RetryPolicy {
    fn is_retriable(self, err: &StorefrontError) -> bool {
        match self {
            Self::Idempotent => matches!(
                err,
                StorefrontError::RateLimited { .. } | StorefrontError::Http(_)
            ),
            Self::ThrottledOnly => matches!(err, StorefrontError::RateLimited { .. }),
        }
    }
}

/// Runs `operation`, retrying retriable errors up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, so `max_retries = 3` with a base of 1 sleeps 1s, 2s, 4s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !policy.is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient storefront error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
