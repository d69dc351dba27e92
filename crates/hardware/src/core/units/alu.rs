//! ALU, ALU control, and their operation encodings.

use crate::common::bits::extract_bits;
use crate::common::Word;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};
use crate::isa;

/// Decoded ALU operation, carried on a word-valued signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Signed addition.
    Add,
    /// Signed subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
}

impl AluOp {
    /// Encodes the operation as a signal word.
    pub fn as_word(self) -> Word {
        Word::from_u32(self as u32)
    }

    /// Decodes an operation from a signal word.
    ///
    /// # Panics
    ///
    /// Panics on an encoding no unit produces.
    pub fn from_word(word: Word) -> Self {
        match word.to_u32() {
            0 => AluOp::Add,
            1 => AluOp::Sub,
            2 => AluOp::And,
            3 => AluOp::Or,
            4 => AluOp::Sll,
            5 => AluOp::Srl,
            other => panic!("invalid ALU operation encoding {}", other),
        }
    }
}

/// Two-input ALU with a zero flag.
pub struct AluUnit {
    /// Left operand.
    pub input0: InId,
    /// Right operand.
    pub input1: InId,
    /// Operation selector, an [`AluOp`] encoding.
    pub alu_op: InId,
    /// Result word.
    pub output: OutId,
    /// 1 when the result is zero.
    pub zero: OutId,
}

impl AluUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        AluUnit {
            input0: nets.input(me),
            input1: nets.input(me),
            alu_op: nets.input(me),
            output: nets.output(),
            zero: nets.output(),
        }
    }
}

impl Unit for AluUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let a = nets.read(self.input0).to_i32();
        let b = nets.read(self.input1).to_i32();
        let result = match AluOp::from_word(nets.read(self.alu_op)) {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Sll => ((a as u32) << (b as u32 & 0x1f)) as i32,
            AluOp::Srl => ((a as u32) >> (b as u32 & 0x1f)) as i32,
        };
        nets.drive(self.output, Word::from_u32(result as u32));
        nets.drive(self.zero, Word::from_u32((result == 0) as u32));
    }
}

/// Expands the control unit's two-bit `alu_op` into an [`AluOp`].
///
/// `00` is Add (address arithmetic), `01` is Sub (branch compare), and `10`
/// selects by the instruction's function fields. `funct7` is consulted only
/// for R-format opcodes, so I-format immediates with bit 30 set still decode
/// as Add.
pub struct AluControl {
    /// The instruction in the execute stage.
    pub instruction: InId,
    /// Two-bit operation class from the control unit.
    pub ctrl_alu_op: InId,
    /// Decoded [`AluOp`] for the ALU.
    pub alu_op: OutId,
}

impl AluControl {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        AluControl {
            instruction: nets.input(me),
            ctrl_alu_op: nets.input(me),
            alu_op: nets.output(),
        }
    }
}

impl Unit for AluControl {
    fn operate(&mut self, nets: &mut Nets) {
        let inst = nets.read(self.instruction).to_u32();
        let op = match nets.read(self.ctrl_alu_op).to_u32() & 0b11 {
            0b00 => AluOp::Add,
            0b01 => AluOp::Sub,
            0b10 => {
                let opcode = extract_bits(inst, 0, 6);
                let func3 = extract_bits(inst, 12, 14);
                let func7 = extract_bits(inst, 25, 31);
                match func3 {
                    0b000 => {
                        if opcode == isa::OPCODE_REG_ARITH && func7 == isa::FUNCT7_ALT {
                            AluOp::Sub
                        } else {
                            AluOp::Add
                        }
                    }
                    0b001 => AluOp::Sll,
                    0b101 => AluOp::Srl,
                    0b110 => AluOp::Or,
                    0b111 => AluOp::And,
                    _ => panic!("invalid instruction {:#010x}", inst),
                }
            }
            other => panic!("invalid ALU operation class {}", other),
        };
        nets.drive(self.alu_op, op.as_word());
    }
}
