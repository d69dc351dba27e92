//! Combinational and clocked datapath units.
//!
//! Each unit declares its ports structurally (handles into the signal
//! arena) and implements `operate` as a pure function of its inputs, except
//! for the units that own architectural state: the register file port, the
//! control unit's link write, and the memory ports.

/// ALU, ALU control, and operation encodings.
pub mod alu;
/// Branch comparison ALU and its control.
pub mod branch;
/// Opcode decode and control signal generation.
pub mod control;
/// Instruction field extraction and immediate generation.
pub mod decoder;
/// Instruction and data memory ports.
pub mod memory;
/// Multiplexers, gates, and width adapters.
pub mod mux;
/// Register file port.
pub mod regfile;

pub use alu::{AluControl, AluOp, AluUnit};
pub use branch::{BranchAluControl, BranchAluUnit, BranchOp};
pub use control::ControlUnit;
pub use decoder::{DecodeUnit, ImmediateGenerator};
pub use memory::{DataMemoryUnit, InstructionMemoryUnit};
pub use mux::{AndGate, Multiplexer, OrGate, SignalNarrower, SignalWidener};
pub use regfile::RegisterFileUnit;
