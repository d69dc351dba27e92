//! Register file and register file unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use rv32_core::core::arch::{RegisterFile, REGISTER_COUNT};
use rv32_core::core::units::RegisterFileUnit;
use rv32_core::framework::{Nets, Role, Unit};
use rv32_core::Word;

// ══════════════════════════════════════════════════════════
// 1. Architectural register file
// ══════════════════════════════════════════════════════════

#[test]
fn registers_initialize_to_zero() {
    let regs = RegisterFile::new();
    assert!((0..REGISTER_COUNT).all(|i| regs.read_register(i).is_zero()));
}

#[test]
fn write_and_read() {
    let mut regs = RegisterFile::new();
    regs.write_register(10, Word::from_u32(0xFA_CADE));
    assert_eq!(regs.read_register(10).to_u32(), 0xFA_CADE);
}

#[test]
fn writes_to_x0_are_discarded() {
    let mut regs = RegisterFile::new();
    regs.write_register(0, Word::from_u32(0xFA_CADE));
    assert_eq!(regs.read_register(0).to_u32(), 0);
}

#[test]
#[should_panic(expected = "out-of-bounds register")]
fn out_of_range_read_panics() {
    RegisterFile::new().read_register(32);
}

#[test]
#[should_panic(expected = "out-of-bounds register")]
fn out_of_range_write_panics() {
    RegisterFile::new().write_register(40, Word::ZERO);
}

// ══════════════════════════════════════════════════════════
// 2. Register file unit
// ══════════════════════════════════════════════════════════

fn unit() -> (Nets, RegisterFileUnit, Rc<RefCell<RegisterFile>>) {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let regs = Rc::new(RefCell::new(RegisterFile::new()));
    let unit = RegisterFileUnit::new(&mut nets, id, regs.clone());
    (nets, unit, regs)
}

#[test]
fn reads_follow_register_state() {
    let (mut nets, mut unit, regs) = unit();
    regs.borrow_mut().write_register(10, Word::from_u32(0xDEAD_BEEF));

    nets.poke(unit.read_register1, Word::from_u32(10));
    unit.operate(&mut nets);
    assert_eq!(nets.read_out(unit.read_data1).to_u32(), 0xDEAD_BEEF);
    assert_eq!(nets.read_out(unit.read_data2).to_u32(), 0);
}

#[test]
fn same_cycle_write_is_seen_by_the_read() {
    let (mut nets, mut unit, _) = unit();
    nets.poke(unit.read_register1, Word::from_u32(10));
    nets.poke(unit.write_register, Word::from_u32(10));
    nets.poke(unit.write_data, Word::from_u32(0xFA_CADE));
    nets.poke(unit.ctrl_reg_write, Word::from_u32(1));
    unit.operate(&mut nets);

    // The write commits before the read: read_data1 shows the new value.
    assert_eq!(nets.read_out(unit.read_data1).to_u32(), 0xFA_CADE);
}

#[test]
fn deasserted_write_enable_preserves_state() {
    let (mut nets, mut unit, regs) = unit();
    nets.poke(unit.write_register, Word::from_u32(4));
    nets.poke(unit.write_data, Word::from_u32(99));
    nets.poke(unit.ctrl_reg_write, Word::from_u32(0));
    unit.operate(&mut nets);

    assert_eq!(regs.borrow().read_register(4).to_u32(), 0);
}

#[test]
fn write_back_to_x0_reads_zero() {
    let (mut nets, mut unit, _) = unit();
    nets.poke(unit.read_register1, Word::from_u32(0));
    nets.poke(unit.write_register, Word::from_u32(0));
    nets.poke(unit.write_data, Word::from_u32(123));
    nets.poke(unit.ctrl_reg_write, Word::from_u32(1));
    unit.operate(&mut nets);

    assert_eq!(nets.read_out(unit.read_data1).to_u32(), 0);
}
