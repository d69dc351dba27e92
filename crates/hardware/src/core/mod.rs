//! Processor core: architectural state, datapath units, and the pipeline.

/// Architectural state (the integer register file).
pub mod arch;
/// The pipelined datapath and its hazard logic.
pub mod pipeline;
/// Combinational and clocked datapath units.
pub mod units;
/// Read-only snapshots for user interfaces.
pub mod view;

pub use pipeline::Processor;
pub use view::{PipelineView, StageView};
