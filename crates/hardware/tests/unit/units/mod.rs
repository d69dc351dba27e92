//! Datapath unit tests.
//!
//! Units are exercised in isolation: inputs are poked directly, `operate`
//! is invoked by hand, and outputs are read back from the nets.

/// ALU and ALU control.
pub mod alu;
/// Branch ALU and its control.
pub mod branch;
/// Field decoder and immediate generator.
pub mod decoder;
/// Multiplexers, gates, and width adapters.
pub mod mux;
/// Register file port.
pub mod regfile;
