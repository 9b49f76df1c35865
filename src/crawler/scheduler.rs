//! Bounded task group for the fan-out phase
//!
//! This module handles:
//! - Spawning one task per link onto a `JoinSet`
//! - Global concurrency limiting via a semaphore
//! - The join barrier, with optional caller-initiated abort

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};

/// What the join barrier collected
#[derive(Debug)]
pub struct JoinOutcome<T> {
    /// Values returned by tasks that ran to completion
    pub completed: Vec<T>,

    /// Labels of tasks that panicked or were aborted before returning, sorted
    pub lost: Vec<String>,

    /// True if the shutdown signal fired before every task finished
    pub interrupted: bool,
}

impl<T> Default for JoinOutcome<T> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            lost: Vec::new(),
            interrupted: false,
        }
    }
}

/// A group of fetch tasks sharing a concurrency limit
///
/// Tasks are spawned immediately but each one waits for a semaphore permit
/// before running its body, so at most `max_concurrent` bodies are in flight.
/// The permit is released when the body finishes. Every task carries a label
/// (the link it fetches) so a task that never reports can still be named.
pub struct FetchPool<T> {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Every task spawned into this pool
    tasks: JoinSet<T>,

    /// Label of every task not yet joined
    labels: HashMap<Id, String>,

    max_concurrent: usize,
}

impl<T: Send + 'static> FetchPool<T> {
    /// Creates a pool allowing `max_concurrent` task bodies at once
    ///
    /// A limit of zero is treated as one.
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            tasks: JoinSet::new(),
            labels: HashMap::new(),
            max_concurrent,
        }
    }

    /// Spawns a task labelled `label` whose body runs once a permit is available
    pub fn spawn<Fut>(&mut self, label: impl Into<String>, body: Fut)
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        let handle = self.tasks.spawn(async move {
            // The semaphore is never closed.
            let _permit = semaphore.acquire_owned().await.ok();
            body.await
        });
        self.labels.insert(handle.id(), label.into());
    }

    /// Number of tasks not yet joined
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is waiting to be joined
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The concurrency limit this pool enforces
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Waits for every task to finish
    pub async fn join_all(&mut self) -> JoinOutcome<T> {
        self.join_until(std::future::pending()).await
    }

    /// Waits for every task to finish, aborting the rest if `shutdown` fires
    ///
    /// Results of tasks that completed before the abort are kept. Aborted or
    /// panicked tasks are logged with their label and listed in `lost`.
    pub async fn join_until<S>(&mut self, shutdown: S) -> JoinOutcome<T>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut outcome = JoinOutcome::default();

        loop {
            tokio::select! {
                biased;

                joined = self.tasks.join_next_with_id() => match joined {
                    Some(Ok((id, value))) => {
                        self.labels.remove(&id);
                        outcome.completed.push(value);
                    }
                    Some(Err(e)) => {
                        let label = self.labels.remove(&e.id()).unwrap_or_default();
                        if e.is_panic() {
                            tracing::error!("Fetch task for {} panicked: {}", label, e);
                        } else {
                            tracing::warn!("Fetch task for {} was aborted", label);
                        }
                        outcome.lost.push(label);
                    }
                    None => break,
                },

                _ = &mut shutdown, if !outcome.interrupted => {
                    tracing::warn!(
                        "Shutdown requested, aborting {} outstanding fetch tasks",
                        self.tasks.len()
                    );
                    outcome.interrupted = true;
                    self.tasks.abort_all();
                }
            }
        }

        outcome.lost.sort();
        outcome
    }
}
