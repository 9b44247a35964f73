//! Worker pool error types.

use std::error::Error;
use std::fmt;

use crate::task::Task;

/// Errors detected by [`WorkerPoolConfig::validate()`](crate::WorkerPoolConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_count` is `Some(0)`.
    NoWorkers,
    /// `queue_capacity` is zero.
    QueueCapacityZero,
    /// `thread_name` is empty.
    EmptyThreadName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker count must be at least 1"),
            Self::QueueCapacityZero => write!(f, "queue capacity must be non-zero"),
            Self::EmptyThreadName => write!(f, "thread name prefix must be non-empty"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from [`WorkerPool::new`](crate::WorkerPool::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The configuration is invalid.
    Config(ConfigError),
    /// The OS refused to start a worker thread.
    Spawn {
        /// The OS error message.
        reason: String,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid worker pool config: {e}"),
            Self::Spawn { reason } => write!(f, "failed to spawn worker thread: {reason}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Spawn { .. } => None,
        }
    }
}

impl From<ConfigError> for PoolError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// A task was not accepted. The task is handed back untouched.
#[derive(Debug)]
pub enum SubmitError {
    /// The queue is at capacity (`try_submit` only).
    Full(Task),
    /// The pool has shut down.
    Closed(Task),
    /// The task holds no callable.
    Empty(Task),
}

impl SubmitError {
    /// Recover the rejected task.
    pub fn into_task(self) -> Task {
        match self {
            Self::Full(task) | Self::Closed(task) | Self::Empty(task) => task,
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => write!(f, "task queue is full"),
            Self::Closed(_) => write!(f, "worker pool has shut down"),
            Self::Empty(_) => write!(f, "task holds no callable"),
        }
    }
}

impl Error for SubmitError {}

/// A spawned task produced no result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked.
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
    /// The task was dropped without running.
    Cancelled,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panicked { message } => write!(f, "task panicked: {message}"),
            Self::Cancelled => write!(f, "task was dropped before it ran"),
        }
    }
}

impl Error for TaskError {}
