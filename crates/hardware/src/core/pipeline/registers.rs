//! Pipeline register groups.
//!
//! A register group is a buffered clocked unit owning paired `*_in`/`*_out`
//! signals plus `should_freeze`/`should_flush` controls:
//! 1. **Buffering:** inputs are captured into a shadow copy before any
//!    clocked unit operates, so clocked units may run in any order.
//! 2. **Freeze:** while asserted, outputs do not change on the clock edge.
//!    Freeze dominates flush.
//! 3. **Flush:** while asserted, the outputs that gate writes (and the
//!    propagated instruction word) latch as zero, turning the downstream
//!    stage into a bubble.
//!
//! The issue unit is the degenerate group holding only the program counter,
//! freezable but not flushable; `MEM_WB` is flushable but never frozen,
//! because the latest source of stalls is strictly upstream of it.

use crate::common::Word;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};

/// One latched `*_in`/`*_out` wire pair.
struct LatchedPair {
    input: InId,
    output: OutId,
    /// Flush drives this output to zero instead of the buffered input.
    clears_on_flush: bool,
}

/// A group of pipeline registers latched together on the clock edge.
pub struct PipelineRegisters {
    pairs: Vec<LatchedPair>,
    should_freeze: Option<InId>,
    should_flush: Option<InId>,
    shadow: Vec<Word>,
    shadow_freeze: bool,
    shadow_flush: bool,
}

impl PipelineRegisters {
    /// Creates an empty group; ports are added with [`PipelineRegisters::latch`].
    pub fn new() -> Self {
        PipelineRegisters {
            pairs: Vec::new(),
            should_freeze: None,
            should_flush: None,
            shadow: Vec::new(),
            shadow_freeze: false,
            shadow_flush: false,
        }
    }

    /// Adds a latched wire pair, returning `(input, output)` handles.
    ///
    /// # Arguments
    ///
    /// * `clears_on_flush` - Zero this output on a flushed clock edge.
    ///   Used for the control signals that gate writes (`reg_write`,
    ///   `mem_write`, `mem_read`) and the propagated instruction word.
    pub fn latch(
        &mut self,
        nets: &mut Nets,
        me: UnitId,
        clears_on_flush: bool,
    ) -> (InId, OutId) {
        let input = nets.input(me);
        let output = nets.output();
        self.pairs.push(LatchedPair {
            input,
            output,
            clears_on_flush,
        });
        self.shadow.push(Word::ZERO);
        (input, output)
    }

    /// Adds the `should_freeze` control input.
    pub fn freeze_control(&mut self, nets: &mut Nets, me: UnitId) -> InId {
        let input = nets.input(me);
        self.should_freeze = Some(input);
        input
    }

    /// Adds the `should_flush` control input.
    pub fn flush_control(&mut self, nets: &mut Nets, me: UnitId) -> InId {
        let input = nets.input(me);
        self.should_flush = Some(input);
        input
    }
}

impl Default for PipelineRegisters {
    fn default() -> Self {
        PipelineRegisters::new()
    }
}

impl Unit for PipelineRegisters {
    fn buffer_inputs(&mut self, nets: &mut Nets) {
        for (slot, pair) in self.shadow.iter_mut().zip(&self.pairs) {
            *slot = nets.read(pair.input);
        }
        self.shadow_freeze = self
            .should_freeze
            .map(|sig| !nets.read(sig).is_zero())
            .unwrap_or(false);
        self.shadow_flush = self
            .should_flush
            .map(|sig| !nets.read(sig).is_zero())
            .unwrap_or(false);
    }

    fn operate(&mut self, nets: &mut Nets) {
        if self.shadow_freeze {
            return;
        }
        for (slot, pair) in self.shadow.iter().zip(&self.pairs) {
            let value = if self.shadow_flush && pair.clears_on_flush {
                Word::ZERO
            } else {
                *slot
            };
            nets.drive(pair.output, value);
        }
    }
}

/// Ports of the issue unit, which owns the architectural program counter.
pub struct IssuePorts {
    /// Next PC (from the PC multiplexer).
    pub pc_in: InId,
    /// Stall control; freezing repeats the current PC.
    pub should_freeze: InId,
    /// PC of the instruction being fetched this cycle.
    pub pc_out: OutId,
}

/// Ports of the IF/ID register group.
pub struct IfIdPorts {
    /// Fetched instruction.
    pub instruction_in: InId,
    /// PC of the fetched instruction.
    pub pc_in: InId,
    /// Stall control.
    pub should_freeze: InId,
    /// Bubble-injection control (branches and load-use stalls).
    pub should_flush: InId,
    /// Instruction entering decode.
    pub instruction_out: OutId,
    /// Its PC.
    pub pc_out: OutId,
}

/// Ports of the ID/EX register group.
pub struct IdExPorts {
    pub reg_write_in: InId,
    pub mem_to_reg_in: InId,
    pub mem_read_in: InId,
    pub mem_write_in: InId,
    pub alu_src_in: InId,
    pub alu_op_in: InId,
    pub pc_in: InId,
    pub read_data1_in: InId,
    pub read_data2_in: InId,
    pub immediate_in: InId,
    pub write_register_in: InId,
    pub read_register1_in: InId,
    pub read_register2_in: InId,
    pub instruction_in: InId,
    pub should_freeze: InId,
    pub reg_write_out: OutId,
    pub mem_to_reg_out: OutId,
    pub mem_read_out: OutId,
    pub mem_write_out: OutId,
    pub alu_src_out: OutId,
    pub alu_op_out: OutId,
    pub pc_out: OutId,
    pub read_data1_out: OutId,
    pub read_data2_out: OutId,
    pub immediate_out: OutId,
    pub write_register_out: OutId,
    pub read_register1_out: OutId,
    pub read_register2_out: OutId,
    pub instruction_out: OutId,
}

/// Ports of the EX/MEM register group.
pub struct ExMemPorts {
    pub reg_write_in: InId,
    pub mem_to_reg_in: InId,
    pub mem_read_in: InId,
    pub mem_write_in: InId,
    pub alu_output_in: InId,
    pub write_data_in: InId,
    pub write_register_in: InId,
    pub instruction_in: InId,
    pub pc_in: InId,
    pub should_freeze: InId,
    pub reg_write_out: OutId,
    pub mem_to_reg_out: OutId,
    pub mem_read_out: OutId,
    pub mem_write_out: OutId,
    pub alu_output_out: OutId,
    pub write_data_out: OutId,
    pub write_register_out: OutId,
    pub instruction_out: OutId,
    pub pc_out: OutId,
}

/// Ports of the MEM/WB register group.
pub struct MemWbPorts {
    pub reg_write_in: InId,
    pub mem_to_reg_in: InId,
    pub read_mem_data_in: InId,
    pub alu_output_in: InId,
    pub write_register_in: InId,
    pub instruction_in: InId,
    pub pc_in: InId,
    pub should_flush: InId,
    pub reg_write_out: OutId,
    pub mem_to_reg_out: OutId,
    pub read_mem_data_out: OutId,
    pub alu_output_out: OutId,
    pub write_register_out: OutId,
    pub instruction_out: OutId,
    pub pc_out: OutId,
}

/// Builds the issue unit.
pub fn build_issue(nets: &mut Nets, me: UnitId) -> (PipelineRegisters, IssuePorts) {
    let mut group = PipelineRegisters::new();
    let (pc_in, pc_out) = group.latch(nets, me, false);
    let should_freeze = group.freeze_control(nets, me);
    (
        group,
        IssuePorts {
            pc_in,
            should_freeze,
            pc_out,
        },
    )
}

/// Builds the IF/ID register group.
pub fn build_if_id(nets: &mut Nets, me: UnitId) -> (PipelineRegisters, IfIdPorts) {
    let mut group = PipelineRegisters::new();
    let (instruction_in, instruction_out) = group.latch(nets, me, true);
    let (pc_in, pc_out) = group.latch(nets, me, false);
    let should_freeze = group.freeze_control(nets, me);
    let should_flush = group.flush_control(nets, me);
    (
        group,
        IfIdPorts {
            instruction_in,
            pc_in,
            should_freeze,
            should_flush,
            instruction_out,
            pc_out,
        },
    )
}

/// Builds the ID/EX register group.
pub fn build_id_ex(nets: &mut Nets, me: UnitId) -> (PipelineRegisters, IdExPorts) {
    let mut group = PipelineRegisters::new();
    let (reg_write_in, reg_write_out) = group.latch(nets, me, true);
    let (mem_to_reg_in, mem_to_reg_out) = group.latch(nets, me, false);
    let (mem_read_in, mem_read_out) = group.latch(nets, me, true);
    let (mem_write_in, mem_write_out) = group.latch(nets, me, true);
    let (alu_src_in, alu_src_out) = group.latch(nets, me, false);
    let (alu_op_in, alu_op_out) = group.latch(nets, me, false);
    let (pc_in, pc_out) = group.latch(nets, me, false);
    let (read_data1_in, read_data1_out) = group.latch(nets, me, false);
    let (read_data2_in, read_data2_out) = group.latch(nets, me, false);
    let (immediate_in, immediate_out) = group.latch(nets, me, false);
    let (write_register_in, write_register_out) = group.latch(nets, me, false);
    let (read_register1_in, read_register1_out) = group.latch(nets, me, false);
    let (read_register2_in, read_register2_out) = group.latch(nets, me, false);
    let (instruction_in, instruction_out) = group.latch(nets, me, true);
    let should_freeze = group.freeze_control(nets, me);
    (
        group,
        IdExPorts {
            reg_write_in,
            mem_to_reg_in,
            mem_read_in,
            mem_write_in,
            alu_src_in,
            alu_op_in,
            pc_in,
            read_data1_in,
            read_data2_in,
            immediate_in,
            write_register_in,
            read_register1_in,
            read_register2_in,
            instruction_in,
            should_freeze,
            reg_write_out,
            mem_to_reg_out,
            mem_read_out,
            mem_write_out,
            alu_src_out,
            alu_op_out,
            pc_out,
            read_data1_out,
            read_data2_out,
            immediate_out,
            write_register_out,
            read_register1_out,
            read_register2_out,
            instruction_out,
        },
    )
}

/// Builds the EX/MEM register group.
pub fn build_ex_mem(nets: &mut Nets, me: UnitId) -> (PipelineRegisters, ExMemPorts) {
    let mut group = PipelineRegisters::new();
    let (reg_write_in, reg_write_out) = group.latch(nets, me, true);
    let (mem_to_reg_in, mem_to_reg_out) = group.latch(nets, me, false);
    let (mem_read_in, mem_read_out) = group.latch(nets, me, true);
    let (mem_write_in, mem_write_out) = group.latch(nets, me, true);
    let (alu_output_in, alu_output_out) = group.latch(nets, me, false);
    let (write_data_in, write_data_out) = group.latch(nets, me, false);
    let (write_register_in, write_register_out) = group.latch(nets, me, false);
    let (instruction_in, instruction_out) = group.latch(nets, me, true);
    let (pc_in, pc_out) = group.latch(nets, me, false);
    let should_freeze = group.freeze_control(nets, me);
    (
        group,
        ExMemPorts {
            reg_write_in,
            mem_to_reg_in,
            mem_read_in,
            mem_write_in,
            alu_output_in,
            write_data_in,
            write_register_in,
            instruction_in,
            pc_in,
            should_freeze,
            reg_write_out,
            mem_to_reg_out,
            mem_read_out,
            mem_write_out,
            alu_output_out,
            write_data_out,
            write_register_out,
            instruction_out,
            pc_out,
        },
    )
}

/// Builds the MEM/WB register group.
pub fn build_mem_wb(nets: &mut Nets, me: UnitId) -> (PipelineRegisters, MemWbPorts) {
    let mut group = PipelineRegisters::new();
    let (reg_write_in, reg_write_out) = group.latch(nets, me, true);
    let (mem_to_reg_in, mem_to_reg_out) = group.latch(nets, me, false);
    let (read_mem_data_in, read_mem_data_out) = group.latch(nets, me, false);
    let (alu_output_in, alu_output_out) = group.latch(nets, me, false);
    let (write_register_in, write_register_out) = group.latch(nets, me, false);
    let (instruction_in, instruction_out) = group.latch(nets, me, true);
    let (pc_in, pc_out) = group.latch(nets, me, false);
    let should_flush = group.flush_control(nets, me);
    (
        group,
        MemWbPorts {
            reg_write_in,
            mem_to_reg_in,
            read_mem_data_in,
            alu_output_in,
            write_register_in,
            instruction_in,
            pc_in,
            should_flush,
            reg_write_out,
            mem_to_reg_out,
            read_mem_data_out,
            alu_output_out,
            write_register_out,
            instruction_out,
            pc_out,
        },
    )
}
