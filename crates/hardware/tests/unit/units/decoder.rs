//! Decoder and immediate generator tests.

use rv32_core::core::units::{DecodeUnit, ImmediateGenerator};
use rv32_core::framework::{Nets, Role, Unit};
use rv32_core::Word;

fn decoder() -> (Nets, DecodeUnit) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = DecodeUnit::new(&mut nets, id);
    (nets, unit)
}

fn imm_gen() -> (Nets, ImmediateGenerator) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = ImmediateGenerator::new(&mut nets, id);
    (nets, unit)
}

#[test]
fn decodes_r_type_fields() {
    let (mut nets, mut unit) = decoder();
    let add = 0b0000000_00011_00010_000_00001_0110011u32; // add x1, x2, x3
    nets.poke(unit.instruction, Word::from_u32(add));
    unit.operate(&mut nets);

    assert_eq!(nets.read_out(unit.read_register1).to_u32(), 2);
    assert_eq!(nets.read_out(unit.read_register2).to_u32(), 3);
    assert_eq!(nets.read_out(unit.write_register).to_u32(), 1);
    assert_eq!(nets.read_out(unit.func3).to_u32(), 0x0);
    assert_eq!(nets.read_out(unit.func7).to_u32(), 0x0);
}

#[test]
fn decodes_sub_func7() {
    let (mut nets, mut unit) = decoder();
    let sub = 0b0100000_00011_00010_000_00001_0110011u32; // sub x1, x2, x3
    nets.poke(unit.instruction, Word::from_u32(sub));
    unit.operate(&mut nets);

    assert_eq!(nets.read_out(unit.func7).to_u32(), 0b0100000);
}

// See Patterson-Hennessy section 2.5 for the immediate layouts.

#[test]
fn i_type_immediates() {
    let (mut nets, mut unit) = imm_gen();
    let addi = 0b001111101000_00010_000_00001_0010011u32; // addi x1, x2, 1000
    nets.poke(unit.instruction, Word::from_u32(addi));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_u32(), 1000);

    let lw = 0b001111101000_00010_010_00001_0000011u32; // lw x1, 1000(x2)
    nets.poke(unit.instruction, Word::from_u32(lw));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_u32(), 1000);
}

#[test]
fn s_type_immediates() {
    let (mut nets, mut unit) = imm_gen();
    let sw = 0b0011111_00001_00010_010_01000_0100011u32; // sw x1, 1000(x2)
    nets.poke(unit.instruction, Word::from_u32(sw));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_u32(), 1000);
}

#[test]
fn negative_immediates_sign_extend() {
    let (mut nets, mut unit) = imm_gen();
    let addi = 0b111111111100_00010_000_00001_0010011u32; // addi x1, x2, -4
    nets.poke(unit.instruction, Word::from_u32(addi));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_i32(), -4);
}

#[test]
fn jal_immediate_is_a_byte_offset() {
    // jal stores the byte offset directly in bits 12..=31.
    let jal = 0b00000000000000000100_00001_1101111u32; // jal x1, 4
    let (mut nets, mut unit) = imm_gen();
    nets.poke(unit.instruction, Word::from_u32(jal));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_u32(), 4);
}

#[test]
fn unknown_format_immediate_is_zero() {
    let (mut nets, mut unit) = imm_gen();
    let add = 0b0000000_00011_00010_000_00001_0110011u32;
    nets.poke(unit.instruction, Word::from_u32(add));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.immediate).to_u32(), 0);
}
