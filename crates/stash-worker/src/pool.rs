//! The worker pool.
//!
//! Each worker receives [`Task`]s via a shared bounded crossbeam channel
//! and runs them one at a time. Workers exit when the channel is closed
//! (sender dropped) and drained, so shutdown never discards queued work.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, SendError, Sender, TrySendError};
use smallvec::SmallVec;
use stash_core::EmptyInvocation;

use crate::config::WorkerPoolConfig;
use crate::error::{PoolError, SubmitError};
use crate::task::{make_task, panic_message, Task, TaskHandle};

#[derive(Debug, Default)]
struct PoolStats {
    run: AtomicU64,
    panicked: AtomicU64,
}

/// Counters reported by [`WorkerPool::shutdown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Worker threads joined cleanly.
    pub workers_joined: usize,
    /// Tasks that returned normally.
    pub tasks_run: u64,
    /// Tasks that panicked.
    pub tasks_panicked: u64,
}

/// A fixed set of worker threads fed by a bounded task queue.
#[derive(Debug)]
pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    workers: SmallVec<[JoinHandle<()>; 8]>,
    stats: Arc<PoolStats>,
    capacity: usize,
}

impl WorkerPool {
    /// Validate `config` and start the workers.
    pub fn new(config: WorkerPoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let worker_count = config.resolved_worker_count();
        let (sender, receiver) = crossbeam_channel::bounded(config.queue_capacity);
        let stats = Arc::new(PoolStats::default());

        let mut workers: SmallVec<[JoinHandle<()>; 8]> = SmallVec::new();
        for index in 0..worker_count {
            let receiver = receiver.clone();
            let stats = Arc::clone(&stats);
            let spawned = thread::Builder::new()
                .name(format!("{}-{index}", config.thread_name))
                .spawn(move || worker_loop(receiver, stats, index));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    drop(sender);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    tracing::error!(error = %e, "failed to spawn worker thread");
                    return Err(PoolError::Spawn {
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            workers = worker_count,
            capacity = config.queue_capacity,
            "worker pool started"
        );
        Ok(Self {
            sender: Some(sender),
            workers,
            stats,
            capacity: config.queue_capacity,
        })
    }

    /// Queue `task`, blocking while the queue is full.
    pub fn submit(&self, task: Task) -> Result<(), SubmitError> {
        if !task.has_value() {
            return Err(SubmitError::Empty(task));
        }
        let Some(sender) = &self.sender else {
            return Err(SubmitError::Closed(task));
        };
        sender
            .send(task)
            .map_err(|SendError(task)| SubmitError::Closed(task))
    }

    /// Queue `task` without blocking.
    pub fn try_submit(&self, task: Task) -> Result<(), SubmitError> {
        if !task.has_value() {
            return Err(SubmitError::Empty(task));
        }
        let Some(sender) = &self.sender else {
            return Err(SubmitError::Closed(task));
        };
        sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(task) => SubmitError::Full(task),
            TrySendError::Disconnected(task) => SubmitError::Closed(task),
        })
    }

    /// Run `f` on a worker and return a handle to its result.
    pub fn spawn<F, R>(&self, f: F) -> Result<TaskHandle<R>, SubmitError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = make_task(f);
        self.submit(task)?;
        Ok(handle)
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Tasks waiting in the queue.
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Maximum number of queued tasks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Close the queue, let the workers drain it, and join them.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.shutdown_inner()
    }

    fn shutdown_inner(&mut self) -> ShutdownReport {
        self.sender.take();
        let mut workers_joined = 0;
        for handle in self.workers.drain(..) {
            match handle.join() {
                Ok(()) => workers_joined += 1,
                Err(_) => tracing::error!("worker thread panicked outside a task"),
            }
        }
        let report = ShutdownReport {
            workers_joined,
            tasks_run: self.stats.run.load(Ordering::Acquire),
            tasks_panicked: self.stats.panicked.load(Ordering::Acquire),
        };
        tracing::debug!(?report, "worker pool shut down");
        report
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.sender.is_some() || !self.workers.is_empty() {
            self.shutdown_inner();
        }
    }
}

/// Main loop for a worker thread.
///
/// Runs until the task channel is closed and empty. A panicking task is
/// logged and counted; the worker carries on with the next one.
fn worker_loop(receiver: Receiver<Task>, stats: Arc<PoolStats>, index: usize) {
    while let Ok(mut task) = receiver.recv() {
        match panic::catch_unwind(AssertUnwindSafe(|| task.call())) {
            Ok(Ok(())) => {
                stats.run.fetch_add(1, Ordering::AcqRel);
            }
            Ok(Err(EmptyInvocation)) => {
                tracing::warn!(worker = index, "skipped empty task");
            }
            Err(payload) => {
                stats.panicked.fetch_add(1, Ordering::AcqRel);
                tracing::warn!(
                    worker = index,
                    message = %panic_message(payload.as_ref()),
                    "task panicked"
                );
            }
        }
    }
    tracing::trace!(worker = index, "worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_worker() -> WorkerPool {
        WorkerPool::new(WorkerPoolConfig {
            worker_count: Some(1),
            queue_capacity: 4,
            ..WorkerPoolConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = WorkerPool::new(WorkerPoolConfig {
            queue_capacity: 0,
            ..WorkerPoolConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            PoolError::Config(crate::error::ConfigError::QueueCapacityZero)
        );
    }

    #[test]
    fn empty_task_is_handed_back() {
        let pool = single_worker();
        let err = pool.submit(Task::empty()).unwrap_err();
        assert!(matches!(err, SubmitError::Empty(_)));
        assert!(!err.into_task().has_value());
    }

    #[test]
    fn worker_threads_carry_the_prefix() {
        let pool = WorkerPool::new(WorkerPoolConfig {
            worker_count: Some(1),
            thread_name: "probe".to_string(),
            ..WorkerPoolConfig::default()
        })
        .unwrap();
        let name = pool
            .spawn(|| thread::current().name().map(str::to_string))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(name.as_deref(), Some("probe-0"));
    }

    #[test]
    fn drop_joins_workers() {
        let pool = single_worker();
        let handle = pool.spawn(|| 5).unwrap();
        drop(pool);
        assert_eq!(handle.join(), Ok(5));
    }

    #[test]
    fn capacity_and_counts() {
        let pool = single_worker();
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.worker_count(), 1);
        let report = pool.shutdown();
        assert_eq!(
            report,
            ShutdownReport {
                workers_joined: 1,
                tasks_run: 0,
                tasks_panicked: 0,
            }
        );
    }
}
