//! Synchronous-circuit framework: signals, units, and scheduling roles.
//!
//! The datapath is a graph of units connected by typed signals. The
//! framework distinguishes combinational logic (executed by event
//! propagation whenever an input changes) from clocked logic (executed by
//! explicit iteration once per cycle), which is the simplest correct
//! simulation of a synchronous circuit. Pipeline registers are the only cut
//! points in the combinational direction, so each stage's fan-in is acyclic.

/// Signal arena: outputs with fanout lists, inputs with owning units.
pub mod signal;
/// The `Unit` trait and scheduling roles.
pub mod unit;

pub use signal::{InId, Nets, OutId, UnitId, WideInId, WideOutId};
pub use unit::{Role, Unit};
