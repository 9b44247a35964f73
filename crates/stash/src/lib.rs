//! Stash: move-only, small-buffer type erasure.
//!
//! This is the facade crate that re-exports the public API of the stash
//! sub-crates. For most users, adding `stash` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::rc::Rc;
//! use stash::prelude::*;
//!
//! // Any value, stored inline when it fits.
//! let mut slot = AnyBox::new(42_i32);
//! assert_eq!(slot.get::<i32>(), Ok(&42));
//! assert!(slot.get::<f64>().is_err());
//! assert_eq!(slot.get::<i32>(), Ok(&42));
//!
//! // A fixed-signature callable.
//! let mut greet = Delegate::<dyn FnMut(&'static str) -> String>::new(|name| format!("hi {name}"));
//! assert_eq!(greet.call("stash").as_deref(), Ok("hi stash"));
//!
//! // A method bound to a shared instance.
//! struct Tally(std::cell::Cell<u32>);
//! impl Tally {
//!     fn bump(&self) -> u32 {
//!         self.0.set(self.0.get() + 1);
//!         self.0.get()
//!     }
//! }
//! let tally = Rc::new(Tally(std::cell::Cell::new(0)));
//! let mut bump = Delegate::<dyn FnMut() -> u32>::bind(Rc::clone(&tally), Tally::bump);
//! bump.call().unwrap();
//! assert_eq!(bump.call(), Ok(2));
//!
//! // One value per type.
//! let mut registry = TypeIndexedMap::new();
//! registry.insert(String::from("config"));
//! assert_eq!(registry.get::<String>().map(String::as_str), Some("config"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stash-core` | `TypeToken` and the container error types |
//! | [`engine`] | `stash-engine` | Storage cell, dispatch tables, `AnyBox`, `Delegate` |
//! | [`registry`] | `stash-registry` | `TypeIndexedMap` |
//! | [`worker`] | `stash-worker` | Task queue, worker pool, task handles |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Type identity and error types (`stash-core`).
pub use stash_core as types;

/// Storage engine and the erased containers (`stash-engine`).
///
/// [`engine::AnyBox`] holds any value; [`engine::Delegate`] holds a
/// callable with a fixed signature.
pub use stash_engine as engine;

/// Type-keyed registry (`stash-registry`).
pub use stash_registry as registry;

/// Worker pool running `Send` delegates (`stash-worker`).
pub use stash_worker as worker;

/// Common imports for typical stash usage.
///
/// ```rust
/// use stash::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use stash_engine::{AnyBox, Delegate, Placement};

    // Identity and errors
    pub use stash_core::{EmptyInvocation, StashError, TypeMismatch, TypeToken};

    // Registry
    pub use stash_registry::TypeIndexedMap;

    // Worker pool
    pub use stash_worker::{make_task, Task, TaskHandle, WorkerPool, WorkerPoolConfig};
}
