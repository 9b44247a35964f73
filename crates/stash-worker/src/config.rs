//! Worker pool configuration.

use crate::error::ConfigError;

/// Configuration for [`WorkerPool`](crate::WorkerPool).
///
/// Validated by [`WorkerPool::new`](crate::WorkerPool::new); immutable
/// once the pool is running.
#[derive(Clone, Debug)]
pub struct WorkerPoolConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub worker_count: Option<usize>,
    /// Maximum number of queued tasks before `submit` blocks and
    /// `try_submit` fails. Default: 1024. Must be non-zero.
    pub queue_capacity: usize,
    /// Thread name prefix; worker `i` is named `{thread_name}-{i}`.
    /// Default: `"stash-worker"`. Must be non-empty.
    pub thread_name: String,
}

impl WorkerPoolConfig {
    /// Default queue capacity.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

    /// Default thread name prefix.
    pub const DEFAULT_THREAD_NAME: &'static str = "stash-worker";

    /// Upper bound applied to an explicit worker count.
    pub const MAX_WORKERS: usize = 64;

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, MAX_WORKERS]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, Self::MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacityZero);
        }
        if self.thread_name.is_empty() {
            return Err(ConfigError::EmptyThreadName);
        }
        Ok(())
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            thread_name: Self::DEFAULT_THREAD_NAME.to_string(),
        }
    }
}
