//! Test fixtures for stash development.
//!
//! Provides drop-observing wrappers ([`DropTally`], [`Tracked`]), a
//! move-only [`Recorder`] resource, a [`Counter`] with shared and
//! exclusive methods for member binding, and payload types sized to
//! land on either side of the inline capacity.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod payloads;

pub use fixtures::{Counter, DropTally, InitFailed, Recorder, RecorderView, Tracked};
pub use payloads::{Large, OverAligned, Small, LARGE_WORDS};
