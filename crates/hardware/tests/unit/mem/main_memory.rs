//! Timed main memory tests.

use rv32_core::common::{Block, Word};
use rv32_core::mem::{MemoryState, TimedMainMemory, TimedMemory};

#[test]
fn write_and_read_round_trip() {
    let mut mem = TimedMainMemory::new(8, 1);
    mem.write_block_now(0x8, &Block::from_u32s(&[0xDEAD_BEEF, 0xBEEF_CAFE]));
    assert_eq!(mem.read_block_now(0x8, 1)[0].to_u32(), 0xDEAD_BEEF);
    assert_eq!(mem.read_block_now(0xC, 1)[0].to_u32(), 0xBEEF_CAFE);
}

#[test]
fn unit_latency_completes_on_the_first_call() {
    let mut mem = TimedMainMemory::new(8, 1);
    assert!(mem.read_block(0x0, 1).is_some());
    assert_eq!(mem.state(), MemoryState::Ready);
}

#[test]
fn latency_counts_not_ready_cycles() {
    let mut mem = TimedMainMemory::new(8, 3);
    mem.poke_word(0x10, Word::from_u32(7));

    assert!(mem.read_block(0x10, 1).is_none());
    assert_eq!(mem.state(), MemoryState::Reading);
    assert!(mem.read_block(0x10, 1).is_none());
    let block = mem.read_block(0x10, 1).expect("third call completes");
    assert_eq!(block[0].to_u32(), 7);
    assert_eq!(mem.state(), MemoryState::Ready);
}

#[test]
fn write_commits_only_on_the_completing_cycle() {
    let mut mem = TimedMainMemory::new(8, 2);
    let block = Block::from_u32s(&[0xAB]);

    assert!(!mem.write_block(0x20, &block));
    assert_eq!(mem.peek_word(0x20).to_u32(), 0, "not committed early");
    assert!(mem.write_block(0x20, &block));
    assert_eq!(mem.peek_word(0x20).to_u32(), 0xAB);
}

#[test]
fn multi_word_reads_cross_word_boundaries() {
    let mut mem = TimedMainMemory::new(8, 1);
    mem.write_block_now(0x10, &Block::from_u32s(&[1, 2, 3, 4]));
    assert_eq!(
        mem.read_block_now(0x10, 4),
        Block::from_u32s(&[1, 2, 3, 4])
    );
}

#[test]
fn peek_and_poke_bypass_the_timing_model() {
    let mut mem = TimedMainMemory::new(8, 50);
    mem.poke_word(0x4, Word::from_u32(9));
    assert_eq!(mem.peek_word(0x4).to_u32(), 9);
    assert_eq!(mem.state(), MemoryState::Ready);
}

// ══════════════════════════════════════════════════════════
// Protocol violations are fatal
// ══════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "same address and length")]
fn changing_the_address_mid_read_panics() {
    let mut mem = TimedMainMemory::new(8, 3);
    let _ = mem.read_block(0x0, 1);
    let _ = mem.read_block(0x4, 1);
}

#[test]
#[should_panic(expected = "while a read is in progress")]
fn writing_during_a_read_panics() {
    let mut mem = TimedMainMemory::new(8, 3);
    let _ = mem.read_block(0x0, 1);
    let _ = mem.write_block(0x0, &Block::from_u32s(&[1]));
}

#[test]
#[should_panic(expected = "while a write is in progress")]
fn reading_during_a_write_panics() {
    let mut mem = TimedMainMemory::new(8, 3);
    let _ = mem.write_block(0x0, &Block::from_u32s(&[1]));
    let _ = mem.read_block(0x0, 1);
}

#[test]
#[should_panic(expected = "same address and block")]
fn changing_the_block_mid_write_panics() {
    let mut mem = TimedMainMemory::new(8, 3);
    let _ = mem.write_block(0x0, &Block::from_u32s(&[1]));
    let _ = mem.write_block(0x0, &Block::from_u32s(&[2]));
}

#[test]
#[should_panic(expected = "not aligned")]
fn unaligned_access_panics() {
    let mut mem = TimedMainMemory::new(8, 1);
    let _ = mem.read_block(0x4, 4);
}

#[test]
#[should_panic(expected = "runs past")]
fn out_of_range_access_panics() {
    let mut mem = TimedMainMemory::new(8, 1);
    let _ = mem.read_block(0x100, 1);
}
