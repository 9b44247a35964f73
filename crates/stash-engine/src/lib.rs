//! Small-buffer, move-only type erasure.
//!
//! Stores a value of any `'static` type either inline, inside the
//! container's own 64-byte footprint, or in an exactly-sized heap block.
//! The choice is made per concrete type at compile time. Every later
//! operation goes through a static per-type dispatch table, so the
//! containers never branch on where the value lives. This crate is the
//! only one in the workspace that may contain `unsafe` code.
//!
//! # Architecture
//!
//! ```text
//! AnyBox / Delegate<S>           (containers: table pointer + cell)
//! ├── &'static Table             (token, placement, move, destroy)
//! │   └── CallTable<S>           (adds invoke for delegates)
//! └── Cell                       (6 words, 16-byte aligned)
//!     └── Slot<T>                (typed construct / move / destruct / pointer)
//! ```
//!
//! # Placement
//!
//! A type is stored inline iff its size is at most [`INLINE_BYTES`] and its
//! alignment at most [`INLINE_ALIGN`]. Rust moves are bitwise and cannot
//! fail, so no further condition applies. Larger or over-aligned types
//! are boxed with their exact layout.
//!
//! # Containers
//!
//! - [`AnyBox`]: holds one value of any type; typed access is checked
//!   against the held type and reports [`TypeMismatch`].
//! - [`Delegate<S>`]: holds one callable matching the signature
//!   `S = dyn FnMut(A..) -> R` (optionally `+ Send`); invoking an empty
//!   delegate reports [`EmptyInvocation`].
//!
//! ```
//! use stash_engine::{AnyBox, Delegate};
//!
//! let mut value = AnyBox::new(41_i32);
//! *value.get_mut::<i32>().unwrap() += 1;
//! assert_eq!(value.get::<i32>(), Ok(&42));
//! assert!(value.get::<String>().is_err());
//!
//! let mut double = Delegate::<dyn FnMut(i32) -> i32>::new(|x| x * 2);
//! assert_eq!(double.call(21), Ok(42));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod any_box;
mod arity;
pub mod cell;
pub mod delegate;
pub mod layout;
pub mod signature;
pub mod table;

pub use any_box::AnyBox;
pub use cell::{Cell, Slot};
pub use delegate::Delegate;
pub use layout::{fits_inline, Placement, INLINE_ALIGN, INLINE_BYTES, INLINE_WORDS};
pub use signature::{Invocable, Signature};
pub use table::{CallTable, CallTableFor, Table, TableFor};

pub use stash_core::{EmptyInvocation, TypeMismatch, TypeToken};
