//! Assembler for the supported RV32I dialect.
//!
//! Encodes human-readable instructions into machine-readable 32-bit words.
//! The accepted line shapes are:
//! 1. `op rd, rs1, rs2` — R-format.
//! 2. `op rd, rs1, imm` — I-format; `op rs1, rs2, imm` — SB-format
//!    branches; `op rs2, rs1, imm` — S-format stores.
//! 3. `op rd, imm(rs1)` — loads and stores in offset form.
//! 4. `op rd, imm` — UJ-format jumps.
//!
//! Immediates are numeric byte offsets (branches and jumps included; there
//! is no halfword shift). A single space is required after each comma;
//! leading and trailing whitespace is tolerated; empty lines are skipped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::common::bits::place_bits;
use crate::common::Word;
use crate::isa;

/// Assembly failure, surfaced to the caller with line information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmError {
    /// The line parsed but the mnemonic is not in the supported set.
    UnknownMnemonic {
        /// 1-based source line.
        line: usize,
        /// The offending mnemonic.
        mnemonic: String,
    },
    /// The line matched no instruction shape.
    Unparseable {
        /// 1-based source line.
        line: usize,
        /// The offending text.
        text: String,
    },
    /// A register operand was `x32` or higher.
    RegisterOutOfRange {
        /// 1-based source line.
        line: usize,
        /// The offending register number.
        register: u32,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownMnemonic { line, mnemonic } => {
                write!(f, "line {}: unsupported instruction '{}'", line, mnemonic)
            }
            AsmError::Unparseable { line, text } => {
                write!(f, "line {}: unable to parse '{}'", line, text)
            }
            AsmError::RegisterOutOfRange { line, register } => {
                write!(f, "line {}: invalid register x{}", line, register)
            }
        }
    }
}

impl std::error::Error for AsmError {}

static R_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+) x(\d+), x(\d+), x(\d+)$").expect("regex"));
static REG_IMM_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+) x(\d+), x(\d+), (-?\d+)$").expect("regex"));
static OFFSET_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+) x(\d+), (-?\d+)\(x(\d+)\)$").expect("regex"));
static JUMP_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+) x(\d+), (-?\d+)$").expect("regex"));

/// `(mnemonic, funct3, funct7)` rows for the R-format instructions.
const R_TABLE: &[(&str, u32, u32)] = &[
    ("add", 0b000, 0b0000000),
    ("sub", 0b000, isa::FUNCT7_ALT),
    ("or", 0b110, 0b0000000),
    ("and", 0b111, 0b0000000),
    ("sll", 0b001, 0b0000000),
    ("srl", 0b101, 0b0000000),
];

/// `(mnemonic, opcode, funct3)` rows for the I-format instructions.
const I_TABLE: &[(&str, u32, u32)] = &[
    ("addi", isa::OPCODE_IMM_ARITH, 0b000),
    ("andi", isa::OPCODE_IMM_ARITH, 0b111),
    ("lw", isa::OPCODE_LOAD, 0b010),
    ("jalr", isa::OPCODE_JALR, 0b000),
];

/// `(mnemonic, funct3)` rows for the S-format stores.
const S_TABLE: &[(&str, u32)] = &[("sw", 0b010)];

/// `(mnemonic, funct3)` rows for the SB-format branches.
const SB_TABLE: &[(&str, u32)] = &[
    ("beq", isa::FUNCT3_BEQ),
    ("bne", isa::FUNCT3_BNE),
    ("blt", isa::FUNCT3_BLT),
    ("bge", isa::FUNCT3_BGE),
];

fn lookup3(table: &[(&str, u32, u32)], name: &str) -> Option<(u32, u32)> {
    table
        .iter()
        .find(|(mnemonic, _, _)| *mnemonic == name)
        .map(|&(_, a, b)| (a, b))
}

fn lookup2(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(mnemonic, _)| *mnemonic == name)
        .map(|&(_, a)| a)
}

fn check_register(line: usize, register: u32) -> Result<u32, AsmError> {
    if register >= 32 {
        return Err(AsmError::RegisterOutOfRange { line, register });
    }
    Ok(register)
}

fn encode_r(rd: u32, func3: u32, rs1: u32, rs2: u32, func7: u32) -> u32 {
    let mut word = place_bits(0, 0, 6, isa::OPCODE_REG_ARITH);
    word = place_bits(word, 7, 11, rd);
    word = place_bits(word, 12, 14, func3);
    word = place_bits(word, 15, 19, rs1);
    word = place_bits(word, 20, 24, rs2);
    place_bits(word, 25, 31, func7)
}

fn encode_i(opcode: u32, rd: u32, func3: u32, rs1: u32, imm: u32) -> u32 {
    let mut word = place_bits(0, 0, 6, opcode);
    word = place_bits(word, 7, 11, rd);
    word = place_bits(word, 12, 14, func3);
    word = place_bits(word, 15, 19, rs1);
    place_bits(word, 20, 31, imm)
}

/// S and SB share the split-immediate layout.
fn encode_s(opcode: u32, func3: u32, rs1: u32, rs2: u32, imm: u32) -> u32 {
    let mut word = place_bits(0, 0, 6, opcode);
    word = place_bits(word, 7, 11, imm);
    word = place_bits(word, 12, 14, func3);
    word = place_bits(word, 15, 19, rs1);
    word = place_bits(word, 20, 24, rs2);
    place_bits(word, 25, 31, imm >> 5)
}

fn encode_uj(rd: u32, imm: u32) -> u32 {
    let mut word = place_bits(0, 0, 6, isa::OPCODE_JAL);
    word = place_bits(word, 7, 11, rd);
    place_bits(word, 12, 31, imm)
}

fn encode_at_line(line_number: usize, line: &str) -> Result<Word, AsmError> {
    let unknown = |mnemonic: &str| AsmError::UnknownMnemonic {
        line: line_number,
        mnemonic: mnemonic.to_string(),
    };

    let encoded = if let Some(caps) = R_FORMAT.captures(line) {
        let name = &caps[1];
        let rd = check_register(line_number, caps[2].parse().expect("digits"))?;
        let rs1 = check_register(line_number, caps[3].parse().expect("digits"))?;
        let rs2 = check_register(line_number, caps[4].parse().expect("digits"))?;
        let (func3, func7) = lookup3(R_TABLE, name).ok_or_else(|| unknown(name))?;
        encode_r(rd, func3, rs1, rs2, func7)
    } else if let Some(caps) = REG_IMM_FORMAT.captures(line) {
        let name = &caps[1];
        let r0 = check_register(line_number, caps[2].parse().expect("digits"))?;
        let r1 = check_register(line_number, caps[3].parse().expect("digits"))?;
        let imm = caps[4].parse::<i64>().expect("digits") as u32;
        if let Some((opcode, func3)) = lookup3(I_TABLE, name) {
            encode_i(opcode, r0, func3, r1, imm)
        } else if let Some(func3) = lookup2(SB_TABLE, name) {
            encode_s(isa::OPCODE_BRANCH, func3, r0, r1, imm)
        } else if let Some(func3) = lookup2(S_TABLE, name) {
            encode_s(isa::OPCODE_STORE, func3, r1, r0, imm)
        } else {
            return Err(unknown(name));
        }
    } else if let Some(caps) = OFFSET_FORMAT.captures(line) {
        let name = &caps[1];
        let r0 = check_register(line_number, caps[2].parse().expect("digits"))?;
        let imm = caps[3].parse::<i64>().expect("digits") as u32;
        let base = check_register(line_number, caps[4].parse().expect("digits"))?;
        if let Some((opcode, func3)) = lookup3(I_TABLE, name) {
            encode_i(opcode, r0, func3, base, imm)
        } else if let Some(func3) = lookup2(S_TABLE, name) {
            encode_s(isa::OPCODE_STORE, func3, base, r0, imm)
        } else {
            return Err(unknown(name));
        }
    } else if let Some(caps) = JUMP_FORMAT.captures(line) {
        let name = &caps[1];
        let rd = check_register(line_number, caps[2].parse().expect("digits"))?;
        let imm = caps[3].parse::<i64>().expect("digits") as u32;
        if name == "jal" {
            encode_uj(rd, imm)
        } else {
            return Err(unknown(name));
        }
    } else {
        return Err(AsmError::Unparseable {
            line: line_number,
            text: line.to_string(),
        });
    };
    Ok(Word::from_u32(encoded))
}

/// Encodes a single instruction line.
pub fn encode_instruction(line: &str) -> Result<Word, AsmError> {
    encode_at_line(1, line.trim())
}

/// Assembles a whole program, skipping empty lines.
///
/// Returns the encoded words in program order; the i-th word belongs at
/// byte offset `4 * i` of instruction memory.
pub fn assemble(source: &str) -> Result<Vec<Word>, AsmError> {
    let mut program = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        program.push(encode_at_line(index + 1, line)?);
    }
    Ok(program)
}
