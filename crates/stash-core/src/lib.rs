//! Core types for the stash workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the opaque type identity carried by every erased container and the
//! two runtime error kinds the containers can report.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod token;

pub use error::{EmptyInvocation, StashError, TypeMismatch};
pub use token::TypeToken;
