//! Multiplexer, gate, and width adapter tests.

use rv32_core::core::units::{AndGate, Multiplexer, OrGate, SignalNarrower, SignalWidener};
use rv32_core::common::Block;
use rv32_core::framework::{Nets, Role, Unit};
use rv32_core::Word;

#[test]
fn multiplexer_selects_by_control() {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let mut mux = Multiplexer::new(&mut nets, id);

    nets.poke(mux.input0, Word::from_u32(0xDEAD_BEEF));
    nets.poke(mux.input1, Word::from_u32(0xFA_CADE));
    nets.poke(mux.control, Word::from_u32(0));
    mux.operate(&mut nets);
    assert_eq!(nets.read_out(mux.output).to_u32(), 0xDEAD_BEEF);

    nets.poke(mux.control, Word::from_u32(1));
    mux.operate(&mut nets);
    assert_eq!(nets.read_out(mux.output).to_u32(), 0xFA_CADE);
}

#[test]
fn and_gate() {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let mut gate = AndGate::new(&mut nets, id);

    for (a, b, expected) in [(1, 1, 1), (0, 1, 0), (1, 0, 0), (0, 0, 0)] {
        nets.poke(gate.input0, Word::from_u32(a));
        nets.poke(gate.input1, Word::from_u32(b));
        gate.operate(&mut nets);
        assert_eq!(nets.read_out(gate.output).to_u32(), expected);
    }
}

#[test]
fn or_gate() {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let mut gate = OrGate::new(&mut nets, id);

    for (a, b, expected) in [(1, 1, 1), (0, 1, 1), (1, 0, 1), (0, 0, 0)] {
        nets.poke(gate.input0, Word::from_u32(a));
        nets.poke(gate.input1, Word::from_u32(b));
        gate.operate(&mut nets);
        assert_eq!(nets.read_out(gate.output).to_u32(), expected);
    }
}

#[test]
fn gates_treat_any_nonzero_as_true() {
    let mut nets = Nets::new();
    let id = nets.add_unit(Role::Combinational);
    let mut gate = AndGate::new(&mut nets, id);

    nets.poke(gate.input0, Word::from_u32(0xFF));
    nets.poke(gate.input1, Word::from_u32(0x100));
    gate.operate(&mut nets);
    assert_eq!(nets.read_out(gate.output).to_u32(), 1);
}

#[test]
fn widener_and_narrower_round_trip() {
    let mut nets = Nets::new();
    let widener_id = nets.add_unit(Role::Combinational);
    let mut widener = SignalWidener::new(&mut nets, widener_id);
    let narrower_id = nets.add_unit(Role::Combinational);
    let mut narrower = SignalNarrower::new(&mut nets, narrower_id);
    nets.connect_wide(widener.output, narrower.input);

    nets.poke(widener.input, Word::from_u32(0xBEEF));
    widener.operate(&mut nets);
    assert_eq!(*nets.read_wide_out(widener.output), Block::from_u32s(&[0xBEEF]));

    narrower.operate(&mut nets);
    assert_eq!(nets.read_out(narrower.output).to_u32(), 0xBEEF);
}
