//! Hazard detection and operand forwarding.
//!
//! These units run in the priority phase, before pipeline registers buffer
//! and latch. They read the registers' `*_in` wires directly (the values the
//! registers are about to capture) instead of owning combinational inputs,
//! and they drive freeze/flush signals consumed in the same cycle. It
//! provides:
//! 1. **Data hazard detection:** load-use stalls with forwarding enabled,
//!    conservative read-after-write stalls without.
//! 2. **Memory hazard detection:** freezes everything upstream of MEM while
//!    a multi-cycle memory transaction is in flight.
//! 3. **Forwarding:** rewrites ID/EX's operand wires with the newest value
//!    from EX/MEM or MEM/WB before ID/EX latches.

use crate::common::bits::extract_bits;
use crate::common::Word;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};

/// Stalls the front end on register dependencies.
///
/// With forwarding enabled only the load-use case stalls: a load in ID/EX
/// whose destination matches a source register of the instruction entering
/// decode costs exactly one bubble. Without forwarding, any pending write in
/// ID/EX or EX/MEM to a nonzero register read by the entering instruction
/// stalls until the writer reaches write-back.
pub struct DataHazardUnit {
    forwarding: bool,
    trace: bool,
    /// IF/ID instruction wire (`instruction_in`).
    if_id_instruction: InId,
    id_ex_mem_read: InId,
    id_ex_reg_write: InId,
    id_ex_write_register: InId,
    ex_mem_reg_write: InId,
    ex_mem_write_register: InId,
    /// Repeat the PC this cycle.
    pub freeze_issue: OutId,
    /// Inject a bubble into decode this cycle.
    pub flush_if_id: OutId,
}

impl DataHazardUnit {
    /// Creates the unit over the given pipeline register wires.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nets: &mut Nets,
        forwarding: bool,
        trace: bool,
        if_id_instruction: InId,
        id_ex_mem_read: InId,
        id_ex_reg_write: InId,
        id_ex_write_register: InId,
        ex_mem_reg_write: InId,
        ex_mem_write_register: InId,
    ) -> Self {
        DataHazardUnit {
            forwarding,
            trace,
            if_id_instruction,
            id_ex_mem_read,
            id_ex_reg_write,
            id_ex_write_register,
            ex_mem_reg_write,
            ex_mem_write_register,
            freeze_issue: nets.output(),
            flush_if_id: nets.output(),
        }
    }
}

impl Unit for DataHazardUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let inst = nets.read(self.if_id_instruction).to_u32();
        let rs1 = extract_bits(inst, 15, 19);
        let rs2 = extract_bits(inst, 20, 24);

        let reads = |wr: u32| wr != 0 && (wr == rs1 || wr == rs2);

        let stall = if self.forwarding {
            let loading = !nets.read(self.id_ex_mem_read).is_zero();
            loading && reads(nets.read(self.id_ex_write_register).to_u32())
        } else {
            let ex_pending = !nets.read(self.id_ex_reg_write).is_zero()
                && reads(nets.read(self.id_ex_write_register).to_u32());
            let mem_pending = !nets.read(self.ex_mem_reg_write).is_zero()
                && reads(nets.read(self.ex_mem_write_register).to_u32());
            ex_pending || mem_pending
        };

        if stall && self.trace {
            eprintln!("[Stall] data hazard against {:#010x}", inst);
        }
        nets.drive(self.freeze_issue, Word::from_u32(stall as u32));
        nets.drive(self.flush_if_id, Word::from_u32(stall as u32));
    }
}

/// Stalls the pipeline while the data memory is not ready.
///
/// Everything upstream of and including EX/MEM freezes, and MEM/WB is
/// flushed each stall cycle so the in-flight access never reaches
/// write-back early.
pub struct MemoryHazardUnit {
    trace: bool,
    /// `is_ready` from the data memory unit.
    pub is_ready: InId,
    /// Repeat the PC this cycle.
    pub freeze_issue: OutId,
    /// Hold the IF/ID registers.
    pub freeze_if_id: OutId,
    /// Hold the ID/EX registers.
    pub freeze_id_ex: OutId,
    /// Hold the EX/MEM registers.
    pub freeze_ex_mem: OutId,
    /// Keep the incomplete access out of write-back.
    pub flush_mem_wb: OutId,
}

impl MemoryHazardUnit {
    /// Creates the unit; `is_ready` is wired by the caller.
    pub fn new(nets: &mut Nets, me: UnitId, trace: bool) -> Self {
        MemoryHazardUnit {
            trace,
            is_ready: nets.input(me),
            freeze_issue: nets.output(),
            freeze_if_id: nets.output(),
            freeze_id_ex: nets.output(),
            freeze_ex_mem: nets.output(),
            flush_mem_wb: nets.output(),
        }
    }
}

impl Unit for MemoryHazardUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let stall = nets.read(self.is_ready).is_zero();
        if stall && self.trace {
            eprintln!("[Stall] memory not ready");
        }
        let word = Word::from_u32(stall as u32);
        nets.drive(self.freeze_issue, word);
        nets.drive(self.freeze_if_id, word);
        nets.drive(self.freeze_id_ex, word);
        nets.drive(self.freeze_ex_mem, word);
        nets.drive(self.flush_mem_wb, word);
    }
}

/// Forwards producer results into ID/EX's operand wires.
///
/// For each source register slot, a matching write sitting in EX/MEM wins
/// over one in MEM/WB; the MEM/WB value is the loaded data or the ALU
/// result as selected by its `mem_to_reg`. The rewrite happens before ID/EX
/// latches, so the ALU sees the forwarded value in the same cycle the
/// producer computed it.
pub struct ForwardingUnit {
    trace: bool,
    id_ex_read_register1: InId,
    id_ex_read_register2: InId,
    id_ex_read_data1: InId,
    id_ex_read_data2: InId,
    ex_mem_reg_write: InId,
    ex_mem_write_register: InId,
    ex_mem_alu_output: InId,
    mem_wb_reg_write: InId,
    mem_wb_write_register: InId,
    mem_wb_mem_to_reg: InId,
    mem_wb_alu_output: InId,
    mem_wb_read_mem_data: InId,
}

impl ForwardingUnit {
    /// Creates the unit over the given pipeline register wires.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trace: bool,
        id_ex_read_register1: InId,
        id_ex_read_register2: InId,
        id_ex_read_data1: InId,
        id_ex_read_data2: InId,
        ex_mem_reg_write: InId,
        ex_mem_write_register: InId,
        ex_mem_alu_output: InId,
        mem_wb_reg_write: InId,
        mem_wb_write_register: InId,
        mem_wb_mem_to_reg: InId,
        mem_wb_alu_output: InId,
        mem_wb_read_mem_data: InId,
    ) -> Self {
        ForwardingUnit {
            trace,
            id_ex_read_register1,
            id_ex_read_register2,
            id_ex_read_data1,
            id_ex_read_data2,
            ex_mem_reg_write,
            ex_mem_write_register,
            ex_mem_alu_output,
            mem_wb_reg_write,
            mem_wb_write_register,
            mem_wb_mem_to_reg,
            mem_wb_alu_output,
            mem_wb_read_mem_data,
        }
    }
}

impl Unit for ForwardingUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let ex_mem_writes = !nets.read(self.ex_mem_reg_write).is_zero();
        let ex_mem_rd = nets.read(self.ex_mem_write_register).to_u32();
        let mem_wb_writes = !nets.read(self.mem_wb_reg_write).is_zero();
        let mem_wb_rd = nets.read(self.mem_wb_write_register).to_u32();

        let slots = [
            (self.id_ex_read_register1, self.id_ex_read_data1),
            (self.id_ex_read_register2, self.id_ex_read_data2),
        ];
        for (slot, (source_register, operand)) in slots.into_iter().enumerate() {
            let rs = nets.read(source_register).to_u32();
            if rs == 0 {
                continue;
            }
            if ex_mem_writes && ex_mem_rd == rs {
                let value = nets.read(self.ex_mem_alu_output);
                if self.trace {
                    eprintln!("[Forward] rs{} = x{} <- EX/MEM {}", slot + 1, rs, value);
                }
                nets.poke(operand, value);
            } else if mem_wb_writes && mem_wb_rd == rs {
                let value = if nets.read(self.mem_wb_mem_to_reg).is_zero() {
                    nets.read(self.mem_wb_alu_output)
                } else {
                    nets.read(self.mem_wb_read_mem_data)
                };
                if self.trace {
                    eprintln!("[Forward] rs{} = x{} <- MEM/WB {}", slot + 1, rs, value);
                }
                nets.poke(operand, value);
            }
        }
    }
}
