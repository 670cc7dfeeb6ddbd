//! Shared plumbing for the Resonance crates: the file system seam used to
//! load registries and configuration, and the tree traversal traits the
//! binder is written against.

pub mod error;
pub mod filesystem;
pub mod visitor;

pub use error::*;
pub use filesystem::*;
pub use visitor::*;
