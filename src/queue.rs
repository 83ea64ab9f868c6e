//! Bounded task queue — ordered registration, explicit start, idle barrier
//!
//! Tasks are registered while the queue is inert and only begin executing
//! when [`TaskQueue::run`] is called. A semaphore permit is acquired *in
//! submission order* before each task is spawned, so at most `concurrency`
//! tasks are ever in flight and admission order is deterministic;
//! completion order is unconstrained once concurrency exceeds 1.
//!
//! `run` resolves exactly once, after every task has settled — the idle
//! signal. It never short-circuits: a failed task does not stop siblings.
//! Each task owns its own result slot, and all slots are handed back
//! together in submission order so the caller can aggregate failures after
//! idle instead of racing to cancel anything.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Ordered list of asynchronous tasks executed under a concurrency ceiling
pub(crate) struct TaskQueue<T> {
    tasks: Vec<BoxFuture<'static, T>>,
    concurrency: usize,
}

impl<T: Send + 'static> TaskQueue<T> {
    /// Create an inert queue with the given concurrency ceiling.
    ///
    /// A ceiling of 0 is treated as 1.
    pub(crate) fn new(concurrency: usize) -> Self {
        Self {
            tasks: Vec::new(),
            concurrency: concurrency.max(1),
        }
    }

    /// Register a task. Registration never starts execution.
    pub(crate) fn push<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.tasks.push(Box::pin(task));
    }

    /// Number of registered tasks.
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Start the queue and wait for every task to settle.
    ///
    /// Returns one result slot per task, in submission order. A task that
    /// panics forfeits its slot; the remaining results keep their relative
    /// submission order.
    pub(crate) async fn run(self) -> Vec<T> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut running: JoinSet<(usize, T)> = JoinSet::new();

        for (index, task) in self.tasks.into_iter().enumerate() {
            // Acquire before spawning: this is what serializes admission
            // into submission order and enforces the ceiling.
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed while we hold it.
                Err(_) => break,
            };
            running.spawn(async move {
                let result = task.await;
                drop(permit);
                (index, result)
            });
        }

        let mut slots = BTreeMap::new();
        while let Some(joined) = running.join_next().await {
            match joined {
                Ok((index, result)) => {
                    slots.insert(index, result);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "queue task panicked");
                }
            }
        }

        slots.into_values().collect()
    }
}
