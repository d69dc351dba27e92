//! ALU and ALU control tests.

use rv32_core::core::units::{AluControl, AluOp, AluUnit};
use rv32_core::framework::{Nets, Role, Unit};
use rv32_core::Word;

fn alu() -> (Nets, AluUnit) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = AluUnit::new(&mut nets, id);
    (nets, unit)
}

fn alu_control() -> (Nets, AluControl) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = AluControl::new(&mut nets, id);
    (nets, unit)
}

fn compute(nets: &mut Nets, unit: &mut AluUnit, a: u32, b: u32, op: AluOp) -> u32 {
    nets.poke(unit.input0, Word::from_u32(a));
    nets.poke(unit.input1, Word::from_u32(b));
    nets.poke(unit.alu_op, op.as_word());
    unit.operate(nets);
    nets.read_out(unit.output).to_u32()
}

// ══════════════════════════════════════════════════════════
// 1. ALU operations
// ══════════════════════════════════════════════════════════

#[test]
fn arithmetic_operations() {
    let (mut nets, mut unit) = alu();
    assert_eq!(compute(&mut nets, &mut unit, 14, 8, AluOp::Add), 22);
    assert_eq!(compute(&mut nets, &mut unit, 14, 8, AluOp::Sub), 6);
    assert_eq!(compute(&mut nets, &mut unit, 8, 14, AluOp::Sub) as i32, -6);
}

#[test]
fn logical_operations() {
    let (mut nets, mut unit) = alu();
    assert_eq!(compute(&mut nets, &mut unit, 1, 0, AluOp::And), 0);
    assert_eq!(compute(&mut nets, &mut unit, 1, 1, AluOp::And), 1);
    assert_eq!(compute(&mut nets, &mut unit, 1, 0, AluOp::Or), 1);
    assert_eq!(compute(&mut nets, &mut unit, 0b1100, 0b1010, AluOp::And), 0b1000);
}

#[test]
fn shift_operations_use_low_five_bits() {
    let (mut nets, mut unit) = alu();
    assert_eq!(compute(&mut nets, &mut unit, 1, 4, AluOp::Sll), 16);
    assert_eq!(compute(&mut nets, &mut unit, 16, 2, AluOp::Srl), 4);
    // Shift amounts wrap at 32.
    assert_eq!(compute(&mut nets, &mut unit, 1, 33, AluOp::Sll), 2);
}

#[test]
fn zero_flag_tracks_result() {
    let (mut nets, mut unit) = alu();
    assert_eq!(compute(&mut nets, &mut unit, 8, 8, AluOp::Sub), 0);
    assert_eq!(nets.read_out(unit.zero).to_u32(), 1);

    assert_eq!(compute(&mut nets, &mut unit, 0, 1, AluOp::And), 0);
    assert_eq!(nets.read_out(unit.zero).to_u32(), 1);

    compute(&mut nets, &mut unit, 3, 4, AluOp::Add);
    assert_eq!(nets.read_out(unit.zero).to_u32(), 0);
}

#[test]
fn wrapping_addition() {
    let (mut nets, mut unit) = alu();
    assert_eq!(compute(&mut nets, &mut unit, u32::MAX, 1, AluOp::Add), 0);
}

// ══════════════════════════════════════════════════════════
// 2. ALU control (see Patterson-Hennessy fig 4.12)
// ══════════════════════════════════════════════════════════

fn decode(nets: &mut Nets, unit: &mut AluControl, inst: u32, class: u32) -> AluOp {
    nets.poke(unit.instruction, Word::from_u32(inst));
    nets.poke(unit.ctrl_alu_op, Word::from_u32(class));
    unit.operate(nets);
    AluOp::from_word(nets.read_out(unit.alu_op))
}

#[test]
fn class_00_is_address_add() {
    let (mut nets, mut unit) = alu_control();
    let lw = 0b001111101000_00010_010_00001_0000011u32;
    assert_eq!(decode(&mut nets, &mut unit, lw, 0b00), AluOp::Add);
}

#[test]
fn class_01_is_branch_sub() {
    let (mut nets, mut unit) = alu_control();
    let beq = 0b0000000_00001_00010_000_00000_1100011u32;
    assert_eq!(decode(&mut nets, &mut unit, beq, 0b01), AluOp::Sub);
}

#[test]
fn r_format_function_fields() {
    let (mut nets, mut unit) = alu_control();
    let add = 0b0000000_00011_00010_000_00001_0110011u32;
    let sub = 0b0100000_00011_00010_000_00001_0110011u32;
    let or = 0b0000000_00011_00010_110_00001_0110011u32;
    let and = 0b0000000_00011_00010_111_00001_0110011u32;
    let sll = 0b0000000_00011_00010_001_00001_0110011u32;
    let srl = 0b0000000_00011_00010_101_00001_0110011u32;
    assert_eq!(decode(&mut nets, &mut unit, add, 0b10), AluOp::Add);
    assert_eq!(decode(&mut nets, &mut unit, sub, 0b10), AluOp::Sub);
    assert_eq!(decode(&mut nets, &mut unit, or, 0b10), AluOp::Or);
    assert_eq!(decode(&mut nets, &mut unit, and, 0b10), AluOp::And);
    assert_eq!(decode(&mut nets, &mut unit, sll, 0b10), AluOp::Sll);
    assert_eq!(decode(&mut nets, &mut unit, srl, 0b10), AluOp::Srl);
}

#[test]
fn addi_decodes_as_add() {
    let (mut nets, mut unit) = alu_control();
    let addi = 0b001111101000_00010_000_00001_0010011u32; // addi x1, x2, 1000
    assert_eq!(decode(&mut nets, &mut unit, addi, 0b10), AluOp::Add);
}

#[test]
fn addi_with_bit_30_set_still_adds() {
    // imm = 1024 puts a 1 where an R-format sub's funct7 bit would be; the
    // funct7 distinction only applies to R-format opcodes.
    let (mut nets, mut unit) = alu_control();
    let addi = 0b010000000000_00010_000_00001_0010011u32; // addi x1, x2, 1024
    assert_eq!(decode(&mut nets, &mut unit, addi, 0b10), AluOp::Add);
}

#[test]
fn andi_decodes_as_and() {
    let (mut nets, mut unit) = alu_control();
    let andi = 0b000000001111_00010_111_00001_0010011u32; // andi x1, x2, 15
    assert_eq!(decode(&mut nets, &mut unit, andi, 0b10), AluOp::And);
}

#[test]
#[should_panic(expected = "invalid instruction")]
fn unsupported_function_field_panics() {
    let (mut nets, mut unit) = alu_control();
    let slti = 0b000000000001_00010_010_00001_0010011u32; // slti: unsupported
    decode(&mut nets, &mut unit, slti, 0b10);
}
