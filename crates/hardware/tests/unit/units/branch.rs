//! Branch ALU and branch control tests.

use rv32_core::core::units::{BranchAluControl, BranchAluUnit, BranchOp};
use rv32_core::framework::{Nets, Role, Unit};
use rv32_core::Word;

fn control() -> (Nets, BranchAluControl) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = BranchAluControl::new(&mut nets, id);
    (nets, unit)
}

fn branch_alu() -> (Nets, BranchAluUnit) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let unit = BranchAluUnit::new(&mut nets, id);
    (nets, unit)
}

fn taken(nets: &mut Nets, unit: &mut BranchAluUnit, a: i32, b: i32, op: BranchOp) -> bool {
    nets.poke(unit.input0, Word::from_u32(a as u32));
    nets.poke(unit.input1, Word::from_u32(b as u32));
    nets.poke(unit.branch_alu_op, op.as_word());
    unit.operate(nets);
    nets.read_out(unit.take_branch).to_u32() == 1
}

#[test]
fn func3_maps_to_comparisons() {
    let (mut nets, mut unit) = control();
    for (func3, expected) in [
        (0b000, BranchOp::Eq),
        (0b001, BranchOp::Ne),
        (0b100, BranchOp::Lt),
        (0b101, BranchOp::Ge),
    ] {
        nets.poke(unit.func3, Word::from_u32(func3));
        unit.operate(&mut nets);
        assert_eq!(BranchOp::from_word(nets.read_out(unit.branch_alu_op)), expected);
    }
}

#[test]
fn non_branch_func3_falls_back_to_eq() {
    let (mut nets, mut unit) = control();
    nets.poke(unit.func3, Word::from_u32(0b010)); // lw's func3
    unit.operate(&mut nets);
    assert_eq!(BranchOp::from_word(nets.read_out(unit.branch_alu_op)), BranchOp::Eq);
}

#[test]
fn equality_comparisons() {
    let (mut nets, mut unit) = branch_alu();
    assert!(taken(&mut nets, &mut unit, 5, 5, BranchOp::Eq));
    assert!(!taken(&mut nets, &mut unit, 5, 6, BranchOp::Eq));
    assert!(taken(&mut nets, &mut unit, 5, 6, BranchOp::Ne));
    assert!(!taken(&mut nets, &mut unit, 5, 5, BranchOp::Ne));
}

#[test]
fn ordered_comparisons_are_signed() {
    let (mut nets, mut unit) = branch_alu();
    assert!(taken(&mut nets, &mut unit, -1, 0, BranchOp::Lt));
    assert!(!taken(&mut nets, &mut unit, 0, -1, BranchOp::Lt));
    assert!(taken(&mut nets, &mut unit, 0, -1, BranchOp::Ge));
    assert!(taken(&mut nets, &mut unit, 3, 3, BranchOp::Ge));
    assert!(!taken(&mut nets, &mut unit, 2, 3, BranchOp::Ge));
}
