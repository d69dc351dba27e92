//! The pipelined processor: unit construction, wiring, and the clock loop.
//!
//! The processor owns every unit, the signal arena, and three scheduling
//! lists. Each call to [`Processor::execute_one_cycle`] performs exactly
//! three ordered phases:
//! 1. **Priority:** hazard detection and forwarding operate, reading the
//!    pipeline registers' `*_in` wires and driving freeze/flush signals.
//! 2. **Buffering:** every buffered unit captures its inputs into its
//!    shadow copy.
//! 3. **Clock:** every clocked unit operates; pipeline registers latch from
//!    their shadows, and each latch cascades through the downstream
//!    combinational units within the same cycle.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::common::Word;
use crate::config::Config;
use crate::core::arch::RegisterFile;
use crate::core::pipeline::hazards::{DataHazardUnit, ForwardingUnit, MemoryHazardUnit};
use crate::core::pipeline::registers::{
    build_ex_mem, build_id_ex, build_if_id, build_issue, build_mem_wb, ExMemPorts, IdExPorts,
    IfIdPorts, IssuePorts, MemWbPorts,
};
use crate::core::units::{
    AluControl, AluOp, AluUnit, AndGate, BranchAluControl, BranchAluUnit, ControlUnit,
    DataMemoryUnit, DecodeUnit, ImmediateGenerator, InstructionMemoryUnit, Multiplexer, OrGate,
    RegisterFileUnit, SignalNarrower, SignalWidener,
};
use crate::core::view::{PipelineView, StageView};
use crate::framework::{Nets, OutId, Role, Unit, UnitId};
use crate::mem::{TimedCache, TimedMainMemory, TimedMemory};
use crate::stats::SimStats;

/// Registration-order builder for the unit arena and scheduling lists.
struct Wiring {
    nets: Nets,
    units: Vec<Option<Box<dyn Unit>>>,
    priority: Vec<UnitId>,
    buffered: Vec<UnitId>,
    clocked: Vec<UnitId>,
}

impl Wiring {
    fn new() -> Self {
        Wiring {
            nets: Nets::new(),
            units: Vec::new(),
            priority: Vec::new(),
            buffered: Vec::new(),
            clocked: Vec::new(),
        }
    }

    /// Reserves a unit slot; list membership follows registration order.
    fn register(&mut self, role: Role) -> UnitId {
        let id = self.nets.add_unit(role);
        self.units.push(None);
        match role {
            Role::Combinational => {}
            Role::Priority => self.priority.push(id),
            Role::Clocked => self.clocked.push(id),
            Role::BufferedClocked => {
                self.buffered.push(id);
                self.clocked.push(id);
            }
        }
        id
    }

    fn install(&mut self, id: UnitId, unit: Box<dyn Unit>) {
        assert!(self.units[id.0].is_none(), "unit installed twice");
        self.units[id.0] = Some(unit);
    }
}

/// Instruction slots the driver may write, the i-th at byte offset `4 * i`.
const INSTRUCTION_SLOTS: usize = 256;

/// The five-stage pipelined processor.
pub struct Processor {
    nets: Nets,
    units: Vec<Option<Box<dyn Unit>>>,
    priority: Vec<UnitId>,
    buffered: Vec<UnitId>,
    clocked: Vec<UnitId>,
    clock_cycle: u64,
    trace: bool,
    stats: SimStats,
    regs: Rc<RefCell<RegisterFile>>,
    imem: Rc<RefCell<TimedMainMemory>>,
    dmem: Rc<RefCell<TimedMainMemory>>,
    issue: IssuePorts,
    if_id: IfIdPorts,
    id_ex: IdExPorts,
    ex_mem: ExMemPorts,
    mem_wb: MemWbPorts,
    data_stall: OutId,
    mem_stall: OutId,
    take_branch: OutId,
}

impl Processor {
    /// Constructs and wires the whole datapath.
    ///
    /// All units are created once here and live for the processor's
    /// lifetime. Configuration errors (cache shape, zero latency, an
    /// instruction address space smaller than the code region) are fatal.
    pub fn new(config: &Config) -> Self {
        assert!(
            1 << config.memory.instruction_space_bits >= INSTRUCTION_SLOTS * 4,
            "instruction address space of {} bits cannot hold {} instruction slots",
            config.memory.instruction_space_bits,
            INSTRUCTION_SLOTS
        );
        let trace = config.general.trace;
        let regs = Rc::new(RefCell::new(RegisterFile::new()));
        let imem = Rc::new(RefCell::new(TimedMainMemory::new(
            config.memory.instruction_space_bits,
            1,
        )));
        let dmem = Rc::new(RefCell::new(TimedMainMemory::new(
            config.memory.data_space_bits,
            config.memory.latency,
        )));
        let data_port: Rc<RefCell<dyn TimedMemory>> = if config.cache.enabled {
            Rc::new(RefCell::new(TimedCache::new(
                config.cache.block_words,
                config.cache.set_size,
                config.cache.blocks,
                config.cache.scheme,
                config.cache.policy,
                dmem.clone(),
                config.cache.latency,
                config.cache.rng_seed,
            )))
        } else {
            dmem.clone()
        };

        let mut w = Wiring::new();

        // Register groups first: they make up the buffered list, and their
        // position at the head of the clocked list keeps the data memory
        // unit (registered later) ticking after EX/MEM has latched.
        let issue_id = w.register(Role::BufferedClocked);
        let (issue_unit, issue) = build_issue(&mut w.nets, issue_id);
        let if_id_id = w.register(Role::BufferedClocked);
        let (if_id_unit, if_id) = build_if_id(&mut w.nets, if_id_id);
        let id_ex_id = w.register(Role::BufferedClocked);
        let (id_ex_unit, id_ex) = build_id_ex(&mut w.nets, id_ex_id);
        let ex_mem_id = w.register(Role::BufferedClocked);
        let (ex_mem_unit, ex_mem) = build_ex_mem(&mut w.nets, ex_mem_id);
        let mem_wb_id = w.register(Role::BufferedClocked);
        let (mem_wb_unit, mem_wb) = build_mem_wb(&mut w.nets, mem_wb_id);

        // Fetch stage.
        let imem_unit_id = w.register(Role::Combinational);
        let imem_unit = InstructionMemoryUnit::new(&mut w.nets, imem_unit_id, imem.clone());
        let pc_adder_id = w.register(Role::Combinational);
        let pc_adder = AluUnit::new(&mut w.nets, pc_adder_id);
        let pc_mux_id = w.register(Role::Combinational);
        let pc_mux = Multiplexer::new(&mut w.nets, pc_mux_id);
        let issue_freeze_or_id = w.register(Role::Combinational);
        let issue_freeze_or = OrGate::new(&mut w.nets, issue_freeze_or_id);
        let if_id_flush_or_id = w.register(Role::Combinational);
        let if_id_flush_or = OrGate::new(&mut w.nets, if_id_flush_or_id);

        // Decode stage.
        let decoder_id = w.register(Role::Combinational);
        let decoder = DecodeUnit::new(&mut w.nets, decoder_id);
        let imm_gen_id = w.register(Role::Combinational);
        let imm_gen = ImmediateGenerator::new(&mut w.nets, imm_gen_id);
        let control_id = w.register(Role::Combinational);
        let control = ControlUnit::new(&mut w.nets, control_id, regs.clone());
        let regfile_unit_id = w.register(Role::Combinational);
        let regfile_unit = RegisterFileUnit::new(&mut w.nets, regfile_unit_id, regs.clone());
        let branch_alu_ctrl_id = w.register(Role::Combinational);
        let branch_alu_ctrl = BranchAluControl::new(&mut w.nets, branch_alu_ctrl_id);
        let branch_alu_id = w.register(Role::Combinational);
        let branch_alu = BranchAluUnit::new(&mut w.nets, branch_alu_id);
        let branch_base_mux_id = w.register(Role::Combinational);
        let branch_base_mux = Multiplexer::new(&mut w.nets, branch_base_mux_id);
        let branch_target_adder_id = w.register(Role::Combinational);
        let branch_target_adder = AluUnit::new(&mut w.nets, branch_target_adder_id);
        let branch_and_id = w.register(Role::Combinational);
        let branch_and = AndGate::new(&mut w.nets, branch_and_id);
        let take_branch_or_id = w.register(Role::Combinational);
        let take_branch_or = OrGate::new(&mut w.nets, take_branch_or_id);

        // Execute stage.
        let alu_ctrl_id = w.register(Role::Combinational);
        let alu_ctrl = AluControl::new(&mut w.nets, alu_ctrl_id);
        let alu_src_mux_id = w.register(Role::Combinational);
        let alu_src_mux = Multiplexer::new(&mut w.nets, alu_src_mux_id);
        let alu_id = w.register(Role::Combinational);
        let alu = AluUnit::new(&mut w.nets, alu_id);

        // Memory stage. The data memory unit is plain clocked and was
        // registered after the register groups, so it ticks once EX/MEM has
        // driven this cycle's address and controls.
        let widener_id = w.register(Role::Combinational);
        let widener = SignalWidener::new(&mut w.nets, widener_id);
        let dmem_unit_id = w.register(Role::Clocked);
        let dmem_unit = DataMemoryUnit::new(&mut w.nets, dmem_unit_id, data_port);
        let narrower_id = w.register(Role::Combinational);
        let narrower = SignalNarrower::new(&mut w.nets, narrower_id);

        // Write-back stage.
        let wb_mux_id = w.register(Role::Combinational);
        let wb_mux = Multiplexer::new(&mut w.nets, wb_mux_id);

        // Hazard units, in priority-phase order.
        let data_hazard_id = w.register(Role::Priority);
        let data_hazard = DataHazardUnit::new(
            &mut w.nets,
            config.pipeline.forwarding,
            trace,
            if_id.instruction_in,
            id_ex.mem_read_in,
            id_ex.reg_write_in,
            id_ex.write_register_in,
            ex_mem.reg_write_in,
            ex_mem.write_register_in,
        );
        let memory_hazard_id = w.register(Role::Priority);
        let memory_hazard = MemoryHazardUnit::new(&mut w.nets, memory_hazard_id, trace);
        let forwarding_id = if config.pipeline.forwarding {
            Some(w.register(Role::Priority))
        } else {
            None
        };
        let forwarding_unit = forwarding_id.map(|_| {
            ForwardingUnit::new(
                trace,
                id_ex.read_register1_in,
                id_ex.read_register2_in,
                id_ex.read_data1_in,
                id_ex.read_data2_in,
                ex_mem.reg_write_in,
                ex_mem.write_register_in,
                ex_mem.alu_output_in,
                mem_wb.reg_write_in,
                mem_wb.write_register_in,
                mem_wb.mem_to_reg_in,
                mem_wb.alu_output_in,
                mem_wb.read_mem_data_in,
            )
        });

        // Constant wires, driven once below.
        let const_four = w.nets.output();
        let const_add_op = w.nets.output();

        // Fetch wiring.
        w.nets.connect(pc_adder.output, pc_mux.input0);
        w.nets.connect(branch_target_adder.output, pc_mux.input1);
        w.nets.connect(take_branch_or.output, pc_mux.control);
        w.nets.connect(pc_mux.output, issue.pc_in);
        w.nets.connect(data_hazard.freeze_issue, issue_freeze_or.input0);
        w.nets.connect(memory_hazard.freeze_issue, issue_freeze_or.input1);
        w.nets.connect(issue_freeze_or.output, issue.should_freeze);
        w.nets.connect(issue.pc_out, imem_unit.address);
        w.nets.connect(issue.pc_out, pc_adder.input0);
        w.nets.connect(const_four, pc_adder.input1);
        w.nets.connect(const_add_op, pc_adder.alu_op);
        w.nets.connect(imem_unit.instruction, if_id.instruction_in);
        w.nets.connect(issue.pc_out, if_id.pc_in);
        w.nets.connect(memory_hazard.freeze_if_id, if_id.should_freeze);
        w.nets.connect(take_branch_or.output, if_id_flush_or.input0);
        w.nets.connect(data_hazard.flush_if_id, if_id_flush_or.input1);
        w.nets.connect(if_id_flush_or.output, if_id.should_flush);

        // Decode wiring. The decoder is wired ahead of the control unit so
        // the control unit's `rd` input is fresh when the link write fires.
        w.nets.connect(if_id.instruction_out, decoder.instruction);
        w.nets.connect(if_id.instruction_out, imm_gen.instruction);
        w.nets.connect(if_id.instruction_out, control.instruction);
        w.nets.connect(if_id.pc_out, control.pc);
        w.nets.connect(decoder.write_register, control.write_register);
        w.nets.connect(decoder.read_register1, regfile_unit.read_register1);
        w.nets.connect(decoder.read_register2, regfile_unit.read_register2);
        w.nets.connect(mem_wb.write_register_out, regfile_unit.write_register);
        w.nets.connect(wb_mux.output, regfile_unit.write_data);
        w.nets.connect(mem_wb.reg_write_out, regfile_unit.ctrl_reg_write);
        w.nets.connect(decoder.func3, branch_alu_ctrl.func3);
        w.nets.connect(branch_alu_ctrl.branch_alu_op, branch_alu.branch_alu_op);
        w.nets.connect(regfile_unit.read_data1, branch_alu.input0);
        w.nets.connect(regfile_unit.read_data2, branch_alu.input1);
        w.nets.connect(if_id.pc_out, branch_base_mux.input0);
        w.nets.connect(regfile_unit.read_data1, branch_base_mux.input1);
        w.nets.connect(control.use_reg_base, branch_base_mux.control);
        w.nets.connect(branch_base_mux.output, branch_target_adder.input0);
        w.nets.connect(imm_gen.immediate, branch_target_adder.input1);
        w.nets.connect(const_add_op, branch_target_adder.alu_op);
        w.nets.connect(control.branch, branch_and.input0);
        w.nets.connect(branch_alu.take_branch, branch_and.input1);
        w.nets.connect(branch_and.output, take_branch_or.input0);
        w.nets.connect(control.is_jump, take_branch_or.input1);

        w.nets.connect(control.reg_write, id_ex.reg_write_in);
        w.nets.connect(control.mem_to_reg, id_ex.mem_to_reg_in);
        w.nets.connect(control.mem_read, id_ex.mem_read_in);
        w.nets.connect(control.mem_write, id_ex.mem_write_in);
        w.nets.connect(control.alu_src, id_ex.alu_src_in);
        w.nets.connect(control.alu_op, id_ex.alu_op_in);
        w.nets.connect(if_id.pc_out, id_ex.pc_in);
        w.nets.connect(regfile_unit.read_data1, id_ex.read_data1_in);
        w.nets.connect(regfile_unit.read_data2, id_ex.read_data2_in);
        w.nets.connect(imm_gen.immediate, id_ex.immediate_in);
        w.nets.connect(decoder.write_register, id_ex.write_register_in);
        w.nets.connect(decoder.read_register1, id_ex.read_register1_in);
        w.nets.connect(decoder.read_register2, id_ex.read_register2_in);
        w.nets.connect(if_id.instruction_out, id_ex.instruction_in);
        w.nets.connect(memory_hazard.freeze_id_ex, id_ex.should_freeze);

        // Execute wiring.
        w.nets.connect(id_ex.instruction_out, alu_ctrl.instruction);
        w.nets.connect(id_ex.alu_op_out, alu_ctrl.ctrl_alu_op);
        w.nets.connect(alu_ctrl.alu_op, alu.alu_op);
        w.nets.connect(id_ex.read_data1_out, alu.input0);
        w.nets.connect(id_ex.read_data2_out, alu_src_mux.input0);
        w.nets.connect(id_ex.immediate_out, alu_src_mux.input1);
        w.nets.connect(id_ex.alu_src_out, alu_src_mux.control);
        w.nets.connect(alu_src_mux.output, alu.input1);

        w.nets.connect(id_ex.reg_write_out, ex_mem.reg_write_in);
        w.nets.connect(id_ex.mem_to_reg_out, ex_mem.mem_to_reg_in);
        w.nets.connect(id_ex.mem_read_out, ex_mem.mem_read_in);
        w.nets.connect(id_ex.mem_write_out, ex_mem.mem_write_in);
        w.nets.connect(alu.output, ex_mem.alu_output_in);
        w.nets.connect(id_ex.read_data2_out, ex_mem.write_data_in);
        w.nets.connect(id_ex.write_register_out, ex_mem.write_register_in);
        w.nets.connect(id_ex.instruction_out, ex_mem.instruction_in);
        w.nets.connect(id_ex.pc_out, ex_mem.pc_in);
        w.nets.connect(memory_hazard.freeze_ex_mem, ex_mem.should_freeze);

        // Memory wiring.
        w.nets.connect(ex_mem.alu_output_out, dmem_unit.address);
        w.nets.connect(ex_mem.write_data_out, widener.input);
        w.nets.connect_wide(widener.output, dmem_unit.write_data);
        w.nets.connect(ex_mem.mem_read_out, dmem_unit.ctrl_mem_read);
        w.nets.connect(ex_mem.mem_write_out, dmem_unit.ctrl_mem_write);
        w.nets.connect_wide(dmem_unit.read_data, narrower.input);
        w.nets.connect(dmem_unit.is_ready, memory_hazard.is_ready);

        w.nets.connect(ex_mem.reg_write_out, mem_wb.reg_write_in);
        w.nets.connect(ex_mem.mem_to_reg_out, mem_wb.mem_to_reg_in);
        w.nets.connect(narrower.output, mem_wb.read_mem_data_in);
        w.nets.connect(ex_mem.alu_output_out, mem_wb.alu_output_in);
        w.nets.connect(ex_mem.write_register_out, mem_wb.write_register_in);
        w.nets.connect(ex_mem.instruction_out, mem_wb.instruction_in);
        w.nets.connect(ex_mem.pc_out, mem_wb.pc_in);
        w.nets.connect(memory_hazard.flush_mem_wb, mem_wb.should_flush);

        // Write-back wiring.
        w.nets.connect(mem_wb.alu_output_out, wb_mux.input0);
        w.nets.connect(mem_wb.read_mem_data_out, wb_mux.input1);
        w.nets.connect(mem_wb.mem_to_reg_out, wb_mux.control);

        // Stats probes and boot pokes need ids that survive the installs.
        let data_stall = data_hazard.freeze_issue;
        let mem_stall = memory_hazard.freeze_issue;
        let take_branch = take_branch_or.output;
        let dmem_is_ready = dmem_unit.is_ready;

        w.install(issue_id, Box::new(issue_unit));
        w.install(if_id_id, Box::new(if_id_unit));
        w.install(id_ex_id, Box::new(id_ex_unit));
        w.install(ex_mem_id, Box::new(ex_mem_unit));
        w.install(mem_wb_id, Box::new(mem_wb_unit));
        w.install(imem_unit_id, Box::new(imem_unit));
        w.install(pc_adder_id, Box::new(pc_adder));
        w.install(pc_mux_id, Box::new(pc_mux));
        w.install(issue_freeze_or_id, Box::new(issue_freeze_or));
        w.install(if_id_flush_or_id, Box::new(if_id_flush_or));
        w.install(decoder_id, Box::new(decoder));
        w.install(imm_gen_id, Box::new(imm_gen));
        w.install(control_id, Box::new(control));
        w.install(regfile_unit_id, Box::new(regfile_unit));
        w.install(branch_alu_ctrl_id, Box::new(branch_alu_ctrl));
        w.install(branch_alu_id, Box::new(branch_alu));
        w.install(branch_base_mux_id, Box::new(branch_base_mux));
        w.install(branch_target_adder_id, Box::new(branch_target_adder));
        w.install(branch_and_id, Box::new(branch_and));
        w.install(take_branch_or_id, Box::new(take_branch_or));
        w.install(alu_ctrl_id, Box::new(alu_ctrl));
        w.install(alu_src_mux_id, Box::new(alu_src_mux));
        w.install(alu_id, Box::new(alu));
        w.install(widener_id, Box::new(widener));
        w.install(dmem_unit_id, Box::new(dmem_unit));
        w.install(narrower_id, Box::new(narrower));
        w.install(wb_mux_id, Box::new(wb_mux));
        w.install(data_hazard_id, Box::new(data_hazard));
        w.install(memory_hazard_id, Box::new(memory_hazard));
        if let (Some(id), Some(unit)) = (forwarding_id, forwarding_unit) {
            w.install(id, Box::new(unit));
        }

        // Boot values: the PC increment constant, the adders' operation,
        // and an idle data memory. The pokes set wire values without
        // running any logic; the combinational graph settles on the first
        // clock, so the first fetch is at PC 0.
        w.nets.drive(const_four, Word::from_u32(4));
        w.nets.drive(const_add_op, AluOp::Add.as_word());
        w.nets.drive(dmem_is_ready, Word::from_u32(1));
        while w.nets.take_pending().is_some() {}

        Processor {
            nets: w.nets,
            units: w.units,
            priority: w.priority,
            buffered: w.buffered,
            clocked: w.clocked,
            clock_cycle: 0,
            trace,
            stats: SimStats::default(),
            regs,
            imem,
            dmem,
            issue,
            if_id,
            id_ex,
            ex_mem,
            mem_wb,
            data_stall,
            mem_stall,
            take_branch,
        }
    }

    /// Advances the processor by one clock cycle.
    pub fn execute_one_cycle(&mut self) {
        self.clock_cycle += 1;
        if self.trace {
            eprintln!("[Cycle] {}", self.clock_cycle);
        }

        for i in 0..self.priority.len() {
            let id = self.priority[i];
            self.run_unit(id);
            self.drain();
        }
        if !self.nets.read_out(self.data_stall).is_zero() {
            self.stats.stalls_data += 1;
        }
        if !self.nets.read_out(self.mem_stall).is_zero() {
            self.stats.stalls_mem += 1;
        }

        for i in 0..self.buffered.len() {
            let id = self.buffered[i];
            let mut unit = self.units[id.0].take().expect("unit missing from arena");
            unit.buffer_inputs(&mut self.nets);
            self.units[id.0] = Some(unit);
        }

        for i in 0..self.clocked.len() {
            let id = self.clocked[i];
            self.run_unit(id);
            self.drain();
        }

        self.stats.cycles += 1;
        if !self.nets.read_out(self.take_branch).is_zero() {
            self.stats.flushes_control += 1;
            if self.trace {
                eprintln!("[Flush] control transfer resolved in decode");
            }
        }
        if !self.nets.read_out(self.mem_wb.instruction_out).is_zero() {
            self.stats.instructions_retired += 1;
        }
    }

    fn run_unit(&mut self, id: UnitId) {
        let mut unit = self.units[id.0].take().expect("unit missing from arena");
        unit.operate(&mut self.nets);
        self.units[id.0] = Some(unit);
    }

    /// Drains the combinational propagation queue.
    fn drain(&mut self) {
        while let Some(id) = self.nets.take_pending() {
            self.run_unit(id);
        }
    }

    /// Cycles executed so far.
    pub fn clock_cycle(&self) -> u64 {
        self.clock_cycle
    }

    /// Accumulated run statistics.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Shared view of the integer register file.
    pub fn registers(&self) -> Ref<'_, RegisterFile> {
        self.regs.borrow()
    }

    /// Mutable view of the integer register file, for pre-loading state.
    pub fn registers_mut(&self) -> RefMut<'_, RegisterFile> {
        self.regs.borrow_mut()
    }

    /// Reads one register.
    pub fn read_register(&self, reg_num: usize) -> Word {
        self.regs.borrow().read_register(reg_num)
    }

    /// Writes one register (test and driver setup).
    pub fn write_register(&mut self, reg_num: usize, value: Word) {
        self.regs.borrow_mut().write_register(reg_num, value);
    }

    /// Writes the program into instruction memory, the i-th instruction at
    /// byte offset `4 * i`.
    ///
    /// # Panics
    ///
    /// Panics when the program does not fit the instruction address space.
    pub fn load_program(&mut self, program: &[Word]) {
        let capacity = self.imem.borrow().len_words();
        assert!(
            program.len() <= capacity,
            "program of {} instructions does not fit {} instruction slots",
            program.len(),
            capacity
        );
        let mut imem = self.imem.borrow_mut();
        for (i, word) in program.iter().enumerate() {
            imem.poke_word((i * 4) as u32, *word);
        }
    }

    /// The instruction memory, for drivers that write code words directly.
    pub fn instruction_memory(&self) -> Rc<RefCell<TimedMainMemory>> {
        self.imem.clone()
    }

    /// The main data memory at the bottom of the hierarchy.
    pub fn data_memory(&self) -> Rc<RefCell<TimedMainMemory>> {
        self.dmem.clone()
    }

    /// Reads a data memory word, bypassing the timing model.
    pub fn peek_data_word(&self, addr: u32) -> Word {
        self.dmem.borrow().peek_word(addr)
    }

    /// Writes a data memory word, bypassing the timing model.
    pub fn poke_data_word(&mut self, addr: u32, word: Word) {
        self.dmem.borrow_mut().poke_word(addr, word);
    }

    /// Read-only per-stage snapshot for user interfaces.
    pub fn view(&self) -> PipelineView {
        let nets = &self.nets;
        PipelineView {
            cycle: self.clock_cycle,
            fetch_pc: nets.read_out(self.issue.pc_out).to_u32(),
            fetch_frozen: !nets.read(self.issue.should_freeze).is_zero(),
            if_id: StageView {
                pc: nets.read_out(self.if_id.pc_out).to_u32(),
                instruction: nets.read_out(self.if_id.instruction_out).to_u32(),
                frozen: !nets.read(self.if_id.should_freeze).is_zero(),
                flushed: !nets.read(self.if_id.should_flush).is_zero(),
            },
            id_ex: StageView {
                pc: nets.read_out(self.id_ex.pc_out).to_u32(),
                instruction: nets.read_out(self.id_ex.instruction_out).to_u32(),
                frozen: !nets.read(self.id_ex.should_freeze).is_zero(),
                flushed: false,
            },
            ex_mem: StageView {
                pc: nets.read_out(self.ex_mem.pc_out).to_u32(),
                instruction: nets.read_out(self.ex_mem.instruction_out).to_u32(),
                frozen: !nets.read(self.ex_mem.should_freeze).is_zero(),
                flushed: false,
            },
            mem_wb: StageView {
                pc: nets.read_out(self.mem_wb.pc_out).to_u32(),
                instruction: nets.read_out(self.mem_wb.instruction_out).to_u32(),
                frozen: false,
                flushed: !nets.read(self.mem_wb.should_flush).is_zero(),
            },
        }
    }
}
