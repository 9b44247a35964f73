//! Type-keyed registry of erased values.
//!
//! A [`TypeIndexedMap`] holds at most one value per distinct type, each
//! stored in an [`AnyBox`](stash_engine::AnyBox). Replacing an entry
//! rebuilds the value in place inside the existing box; entries are never
//! copied.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod map;

pub use map::TypeIndexedMap;
