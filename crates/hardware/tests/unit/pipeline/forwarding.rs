//! Forwarding path tests.

use crate::common::harness::TestContext;

#[test]
fn forwards_from_ex_mem_to_the_next_instruction() {
    let mut ctx = TestContext::with_forwarding(&["addi x1, x0, 2", "addi x2, x1, 3"]);
    ctx.run(6);
    assert_eq!(ctx.reg(1), 2);
    assert_eq!(ctx.reg(2), 5);
}

#[test]
fn forwards_a_load_result_from_mem_wb() {
    let program = ["lw x1, 0(x0)", "add x0, x0, x0", "add x2, x1, x1"];
    let mut ctx = TestContext::with_forwarding(&program);
    ctx.set_mem(0x0, 24);
    ctx.run(4 + program.len() as u64);

    assert_eq!(ctx.reg(1), 24);
    assert_eq!(ctx.reg(2), 48);
}

#[test]
fn forwards_both_operand_slots_independently() {
    let program = ["addi x1, x0, 3", "addi x2, x0, 4", "add x3, x1, x2"];
    let mut ctx = TestContext::with_forwarding(&program);
    ctx.run(7);

    // x2 comes from EX/MEM, x1 from MEM/WB, in the same cycle.
    assert_eq!(ctx.reg(3), 7);
}

#[test]
fn ex_mem_result_wins_over_mem_wb() {
    let program = ["addi x1, x0, 1", "addi x1, x0, 2", "add x2, x1, x1"];
    let mut ctx = TestContext::with_forwarding(&program);
    ctx.run(7);

    assert_eq!(ctx.reg(2), 4, "the younger producer's value is forwarded");
}

#[test]
fn no_forwarding_for_x0() {
    // x0 matches no forwarding slot even with a stale zero in flight.
    let program = ["addi x0, x0, 9", "add x2, x0, x0"];
    let mut ctx = TestContext::with_forwarding(&program);
    ctx.run(6);
    assert_eq!(ctx.reg(2), 0);
}

#[test]
fn dependent_alu_chain_matches_register_semantics() {
    let program = [
        "addi x1, x0, 5",
        "add x2, x1, x1",
        "sub x3, x2, x1",
        "or x4, x3, x1",
        "and x5, x4, x2",
        "sll x6, x1, x1",
        "srl x7, x6, x1",
    ];
    let mut ctx = TestContext::with_forwarding(&program);
    ctx.run(20);

    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 10);
    assert_eq!(ctx.reg(3), 5);
    assert_eq!(ctx.reg(4), 5);
    assert_eq!(ctx.reg(5), 0);
    assert_eq!(ctx.reg(6), 5 << 5);
    assert_eq!(ctx.reg(7), 5);
}

#[test]
fn forwarding_parity_with_stalled_execution() {
    // The same memory-free programs must reach the same architectural state
    // with forwarding on (bypassed operands) and off (conservative stalls),
    // given enough extra cycles for the stalls.
    let programs: &[&[&str]] = &[
        &["addi x1, x0, 2", "addi x2, x1, 3"],
        &[
            "addi x1, x0, 5",
            "add x2, x1, x1",
            "sub x3, x2, x1",
            "or x4, x3, x1",
            "and x5, x4, x2",
        ],
        &[
            "addi x10, x0, 7",
            "addi x11, x10, 1",
            "sll x12, x11, x10",
            "add x13, x12, x11",
        ],
    ];

    for program in programs {
        let mut fast = TestContext::with_forwarding(program);
        let mut slow = TestContext::without_forwarding(program);
        fast.run(40);
        slow.run(40);
        assert_eq!(
            fast.all_regs(),
            slow.all_regs(),
            "forwarding changed the outcome of {:?}",
            program
        );
    }
}
