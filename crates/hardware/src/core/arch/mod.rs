//! Architectural state.

/// The integer register file.
pub mod regfile;

pub use regfile::{RegisterFile, REGISTER_COUNT};
