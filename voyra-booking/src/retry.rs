use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Resolution of a single read-compute-write round
#[derive(Debug)]
pub enum Attempt<T> {
    /// The conditional write committed
    Committed(T),
    /// Version mismatch; the round must be rerun from a fresh read
    Contended,
}

/// Why a retried operation did not produce a value
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt saw a version mismatch
    Exhausted { attempts: u32 },
    /// A terminal error from inside a round; never retried
    Inner(E),
}

/// Bounded retry driver for conditional writes.
///
/// Each round is a complete read-compute-write pass: the closure must re-read
/// state and recompute its write from what it just read, never from a value
/// captured before an earlier attempt. Business rules stay in the closure;
/// the budget and backoff live here so every inventory-consuming operation
/// shares one tested policy.
#[derive(Debug, Clone, Copy)]
pub struct ConflictRetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl ConflictRetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `round` until it commits, fails terminally, or the budget runs
    /// out. Linear backoff between contended rounds, none after the last.
    pub async fn run<T, E, F, Fut>(&self, mut round: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Attempt<T>, E>>,
    {
        for attempt in 1..=self.max_attempts {
            match round(attempt).await.map_err(RetryError::Inner)? {
                Attempt::Committed(value) => return Ok(value),
                Attempt::Contended => {
                    debug!("conditional write contended (attempt {attempt}/{})", self.max_attempts);
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        Err(RetryError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for ConflictRetryPolicy {
    fn default() -> Self {
        Self::new(4, Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_commits_on_first_attempt() {
        let policy = ConflictRetryPolicy::new(3, Duration::ZERO);

        let result: Result<i32, RetryError<()>> =
            policy.run(|_| async { Ok(Attempt::Committed(7)) }).await;

        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_retries_until_commit() {
        let policy = ConflictRetryPolicy::new(5, Duration::ZERO);
        let rounds = AtomicU32::new(0);

        let result: Result<u32, RetryError<()>> = policy
            .run(|attempt| {
                rounds.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Ok(Attempt::Contended)
                    } else {
                        Ok(Attempt::Committed(attempt))
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(rounds.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_budget_on_permanent_contention() {
        let policy = ConflictRetryPolicy::new(4, Duration::ZERO);

        let result: Result<(), RetryError<()>> =
            policy.run(|_| async { Ok(Attempt::Contended) }).await;

        match result {
            Err(RetryError::Exhausted { attempts }) => assert_eq!(attempts, 4),
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_terminal_error_aborts_immediately() {
        let policy = ConflictRetryPolicy::new(5, Duration::ZERO);
        let rounds = AtomicU32::new(0);

        let result: Result<(), RetryError<&str>> = policy
            .run(|_| {
                rounds.fetch_add(1, Ordering::SeqCst);
                async { Err("capacity gone") }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Inner("capacity gone"))));
        assert_eq!(rounds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_budget_is_never_zero() {
        let policy = ConflictRetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }
}
