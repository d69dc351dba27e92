//! Instruction-set constants for the supported RV32I subset.
//!
//! Opcode and function-field values shared by the control units and the
//! assembler. All field positions are the standard RISC-V ones; branch and
//! jump immediates are byte offsets stored directly in their fields.

/// `lw` (I-format loads).
pub const OPCODE_LOAD: u32 = 0b0000011;
/// `addi`, `andi` (I-format register-immediate arithmetic).
pub const OPCODE_IMM_ARITH: u32 = 0b0010011;
/// `add`, `sub`, `or`, `and`, `sll`, `srl` (R-format).
pub const OPCODE_REG_ARITH: u32 = 0b0110011;
/// `sw` (S-format stores).
pub const OPCODE_STORE: u32 = 0b0100011;
/// `beq`, `bne`, `blt`, `bge` (SB-format conditional branches).
pub const OPCODE_BRANCH: u32 = 0b1100011;
/// `jal` (UJ-format unconditional jump).
pub const OPCODE_JAL: u32 = 0b1101111;
/// `jalr` (I-format register-relative jump).
pub const OPCODE_JALR: u32 = 0b1100111;

/// `funct7` distinguishing `sub` from `add` (and `sra` from `srl`).
pub const FUNCT7_ALT: u32 = 0b0100000;

/// `funct3` values for the conditional branches.
pub const FUNCT3_BEQ: u32 = 0b000;
/// See [`FUNCT3_BEQ`].
pub const FUNCT3_BNE: u32 = 0b001;
/// See [`FUNCT3_BEQ`].
pub const FUNCT3_BLT: u32 = 0b100;
/// See [`FUNCT3_BEQ`].
pub const FUNCT3_BGE: u32 = 0b101;
