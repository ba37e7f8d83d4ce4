//! The bounded worker pool that serialises admission and healing work
//! (spec §5's scheduling model) without letting either starve query
//! traffic, which never goes through this pool at all.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use remembrance_domain::{Error, Result};
use tokio::sync::Semaphore;

/// Bounded concurrency gate: at most `capacity` admission/healing tasks
/// run at once, and at most `capacity * QUEUE_FACTOR` more may wait for a
/// slot before new submissions are rejected outright.
const QUEUE_FACTOR: usize = 4;

pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    max_queue_depth: usize,
    queued: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Builds a pool with `capacity` concurrent slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            max_queue_depth: capacity * QUEUE_FACTOR,
            queued: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs `task` once a slot is free, or returns
    /// `Error::Overloaded` immediately if the queue is already at
    /// capacity.
    pub async fn run<F, Fut, T>(&self, context: &'static str, task: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.queued.fetch_add(1, Ordering::SeqCst) >= self.max_queue_depth {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Overloaded {
                context: context.to_owned(),
            });
        }

        let permit = self.semaphore.clone().acquire_owned().await;
        self.queued.fetch_sub(1, Ordering::SeqCst);
        let _permit = permit.map_err(|_| Error::Internal {
            context: "worker pool semaphore closed".to_owned(),
        })?;

        task().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_task_and_returns_its_result() {
        let pool = WorkerPool::new(2);
        let result = pool.run("test", || async { Ok(42) }).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn overloaded_queue_is_rejected() {
        let pool = WorkerPool::new(1);
        pool.queued.store(usize::MAX - 1, Ordering::SeqCst);
        let result: Result<()> = pool.run("test", || async { Ok(()) }).await;
        assert!(matches!(result, Err(Error::Overloaded { .. })));
    }
}
