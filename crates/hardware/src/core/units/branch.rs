//! Branch comparison ALU and its control.

use crate::common::Word;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};
use crate::isa;

/// Branch comparison operation, carried on a word-valued signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOp {
    /// Taken when the operands are equal.
    Eq,
    /// Taken when the operands differ.
    Ne,
    /// Taken when `a < b`, signed.
    Lt,
    /// Taken when `a >= b`, signed.
    Ge,
}

impl BranchOp {
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
            0 => BranchOp::Eq,
            1 => BranchOp::Ne,
            2 => BranchOp::Lt,
            3 => BranchOp::Ge,
            other => panic!("invalid branch operation encoding {}", other),
        }
    }
}

/// Maps a branch's `funct3` to a [`BranchOp`].
///
/// Non-branch `funct3` values fall back to `Eq`; the comparison result is
/// gated by the `branch` control signal downstream, so the fallback is never
/// observable.
pub struct BranchAluControl {
    /// `funct3` from the decoder.
    pub func3: InId,
    /// Decoded comparison operation.
    pub branch_alu_op: OutId,
}

impl BranchAluControl {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        BranchAluControl {
            func3: nets.input(me),
            branch_alu_op: nets.output(),
        }
    }
}

impl Unit for BranchAluControl {
    fn operate(&mut self, nets: &mut Nets) {
        let op = match nets.read(self.func3).to_u32() {
            isa::FUNCT3_BNE => BranchOp::Ne,
            isa::FUNCT3_BLT => BranchOp::Lt,
            isa::FUNCT3_BGE => BranchOp::Ge,
            _ => BranchOp::Eq,
        };
        nets.drive(self.branch_alu_op, op.as_word());
    }
}

/// Compares the two register operands of a branch in the decode stage.
pub struct BranchAluUnit {
    /// Left operand (`rs1` data).
    pub input0: InId,
    /// Right operand (`rs2` data).
    pub input1: InId,
    /// Comparison selector, a [`BranchOp`] encoding.
    pub branch_alu_op: InId,
    /// 1 when the comparison holds.
    pub take_branch: OutId,
}

impl BranchAluUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        BranchAluUnit {
            input0: nets.input(me),
            input1: nets.input(me),
            branch_alu_op: nets.input(me),
            take_branch: nets.output(),
        }
    }
}

impl Unit for BranchAluUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let a = nets.read(self.input0).to_i32();
        let b = nets.read(self.input1).to_i32();
        let taken = match BranchOp::from_word(nets.read(self.branch_alu_op)) {
            BranchOp::Eq => a == b,
            BranchOp::Ne => a != b,
            BranchOp::Lt => a < b,
            BranchOp::Ge => a >= b,
        };
        nets.drive(self.take_branch, Word::from_u32(taken as u32));
    }
}
