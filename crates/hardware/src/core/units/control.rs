//! The main control unit.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::bits::extract_bits;
use crate::common::Word;
use crate::core::arch::RegisterFile;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};
use crate::isa;

/// Decodes the opcode into the stage control signals.
///
/// For unconditional jumps the unit also performs the link write: `pc + 4`
/// is written to `rd` immediately while decoding, rather than flowing down
/// the pipeline to write-back. The linked value is therefore architecturally
/// visible before downstream squashed instructions complete.
pub struct ControlUnit {
    /// The instruction in the decode stage.
    pub instruction: InId,
    /// PC of that instruction, for the link write.
    pub pc: InId,
    /// `rd` field from the decoder, for the link write.
    pub write_register: InId,
    /// Register-file write enable for the write-back stage.
    pub reg_write: OutId,
    /// 1 selects the immediate as the ALU's right operand.
    pub alu_src: OutId,
    /// Two-bit ALU operation class for [`super::alu::AluControl`].
    pub alu_op: OutId,
    /// Data memory write enable.
    pub mem_write: OutId,
    /// Data memory read enable.
    pub mem_read: OutId,
    /// 1 selects loaded data over the ALU result at write-back.
    pub mem_to_reg: OutId,
    /// Instruction is a conditional branch.
    pub branch: OutId,
    /// 1 bases the branch target on `rs1` data instead of the PC (`jalr`).
    pub use_reg_base: OutId,
    /// Instruction is an unconditional jump (`jal`/`jalr`).
    pub is_jump: OutId,
    regs: Rc<RefCell<RegisterFile>>,
}

impl ControlUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId, regs: Rc<RefCell<RegisterFile>>) -> Self {
        ControlUnit {
            instruction: nets.input(me),
            pc: nets.input(me),
            write_register: nets.input(me),
            reg_write: nets.output(),
            alu_src: nets.output(),
            alu_op: nets.output(),
            mem_write: nets.output(),
            mem_read: nets.output(),
            mem_to_reg: nets.output(),
            branch: nets.output(),
            use_reg_base: nets.output(),
            is_jump: nets.output(),
            regs,
        }
    }
}

/// All control outputs of one decoded instruction, zeroed by default.
#[derive(Default)]
struct Decoded {
    reg_write: u32,
    alu_src: u32,
    alu_op: u32,
    mem_write: u32,
    mem_read: u32,
    mem_to_reg: u32,
    branch: u32,
    use_reg_base: u32,
    is_jump: u32,
}

impl Unit for ControlUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let inst = nets.read(self.instruction).to_u32();
        let mut d = Decoded::default();
        // The all-zero word is a bubble; every control output stays zero.
        if inst != 0 {
            match extract_bits(inst, 0, 6) {
                isa::OPCODE_REG_ARITH => {
                    d.reg_write = 1;
                    d.alu_op = 0b10;
                }
                isa::OPCODE_IMM_ARITH => {
                    d.reg_write = 1;
                    d.alu_src = 1;
                    d.alu_op = 0b10;
                }
                isa::OPCODE_LOAD => {
                    d.reg_write = 1;
                    d.alu_src = 1;
                    d.mem_read = 1;
                    d.mem_to_reg = 1;
                }
                isa::OPCODE_STORE => {
                    d.alu_src = 1;
                    d.mem_write = 1;
                }
                isa::OPCODE_BRANCH => {
                    d.branch = 1;
                    d.alu_op = 0b01;
                }
                isa::OPCODE_JAL => {
                    d.is_jump = 1;
                }
                isa::OPCODE_JALR => {
                    d.is_jump = 1;
                    d.use_reg_base = 1;
                }
                _ => panic!("invalid instruction {:#010x}", inst),
            }
            if d.is_jump == 1 {
                // Link write, performed while decoding. The decoder is wired
                // ahead of this unit, so `rd` is fresh here.
                let rd = nets.read(self.write_register).to_u32() as usize;
                if rd != 0 {
                    let link = nets.read(self.pc).to_u32().wrapping_add(4);
                    self.regs.borrow_mut().write_register(rd, Word::from_u32(link));
                }
            }
        }
        nets.drive(self.reg_write, Word::from_u32(d.reg_write));
        nets.drive(self.alu_src, Word::from_u32(d.alu_src));
        nets.drive(self.alu_op, Word::from_u32(d.alu_op));
        nets.drive(self.mem_write, Word::from_u32(d.mem_write));
        nets.drive(self.mem_read, Word::from_u32(d.mem_read));
        nets.drive(self.mem_to_reg, Word::from_u32(d.mem_to_reg));
        nets.drive(self.branch, Word::from_u32(d.branch));
        nets.drive(self.use_reg_base, Word::from_u32(d.use_reg_base));
        nets.drive(self.is_jump, Word::from_u32(d.is_jump));
    }
}
