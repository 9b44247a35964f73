//! Worker pool running type-erased delegates.
//!
//! Work items are [`Task`]s: `Send` delegates with no arguments and no
//! result. They move through a bounded crossbeam channel to a fixed set
//! of named worker threads and are never copied. [`make_task`] and
//! [`WorkerPool::spawn`] wrap a one-shot closure so its result (or its
//! panic) comes back through a [`TaskHandle`].
//!
//! ```
//! use stash_worker::{WorkerPool, WorkerPoolConfig};
//!
//! let pool = WorkerPool::new(WorkerPoolConfig {
//!     worker_count: Some(2),
//!     ..WorkerPoolConfig::default()
//! })
//! .unwrap();
//!
//! let answer = pool.spawn(|| 6 * 7).unwrap();
//! assert_eq!(answer.join(), Ok(42));
//!
//! let report = pool.shutdown();
//! assert_eq!(report.workers_joined, 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;
pub mod task;

pub use config::WorkerPoolConfig;
pub use error::{ConfigError, PoolError, SubmitError, TaskError};
pub use pool::{ShutdownReport, WorkerPool};
pub use task::{make_task, Task, TaskHandle};
