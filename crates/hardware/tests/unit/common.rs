//! Word, Block, and bit-field helper tests.

use rv32_core::common::bits::{extract_bits, is_aligned, nbytes, place_bits, sign_extend};
use rv32_core::common::{Block, Word};

// ══════════════════════════════════════════════════════════
// 1. Word
// ══════════════════════════════════════════════════════════

#[test]
fn word_defaults_to_zero() {
    assert_eq!(Word::default().to_u32(), 0);
    assert!(Word::ZERO.is_zero());
}

#[test]
fn word_u32_round_trip() {
    let word = Word::from_u32(0xDEAD_BEEF);
    assert_eq!(word.to_u32(), 0xDEAD_BEEF);
    assert_eq!(u32::from(word), 0xDEAD_BEEF);
}

#[test]
fn word_f32_reinterprets_same_bytes() {
    let word = Word::from_f32(3.2);
    assert_eq!(word.to_f32(), 3.2);
    // The float view is a bit reinterpretation, not a conversion.
    assert_eq!(word.to_u32(), 3.2_f32.to_bits());
}

#[test]
fn word_signed_view() {
    assert_eq!(Word::from_u32(u32::MAX).to_i32(), -1);
}

// ══════════════════════════════════════════════════════════
// 2. Block
// ══════════════════════════════════════════════════════════

#[test]
fn block_starts_zeroed() {
    let block = Block::new(4);
    assert_eq!(block.len(), 4);
    assert!(block.iter().all(|w| w.is_zero()));
}

#[test]
fn block_subblock_reads_a_window() {
    let block = Block::from_u32s(&[0xA, 0xB, 0xC, 0xD]);
    let sub = block.subblock(1, 2);
    assert_eq!(sub, Block::from_u32s(&[0xB, 0xC]));
}

#[test]
fn block_set_subblock_overwrites_a_window() {
    let mut block = Block::new(4);
    block.set_subblock(2, &Block::from_u32s(&[0x1, 0x2]));
    assert_eq!(block, Block::from_u32s(&[0, 0, 0x1, 0x2]));
}

#[test]
fn block_copy_from_equal_size() {
    let mut block = Block::new(2);
    block.copy_from(&Block::from_u32s(&[7, 8]));
    assert_eq!(block[0].to_u32(), 7);
    assert_eq!(block[1].to_u32(), 8);
}

#[test]
#[should_panic(expected = "block sizes must agree")]
fn block_copy_from_size_mismatch_panics() {
    let mut block = Block::new(2);
    block.copy_from(&Block::new(3));
}

#[test]
#[should_panic(expected = "out of range")]
fn block_subblock_past_end_panics() {
    Block::new(4).subblock(3, 2);
}

// ══════════════════════════════════════════════════════════
// 3. Bit helpers
// ══════════════════════════════════════════════════════════

#[test]
fn extract_and_place_are_inverses() {
    let word = 0b0000000_00011_00010_000_00001_0110011u32;
    assert_eq!(extract_bits(word, 0, 6), 0b0110011);
    assert_eq!(extract_bits(word, 15, 19), 2);
    assert_eq!(extract_bits(word, 20, 24), 3);
    let rebuilt = place_bits(word, 20, 24, 31);
    assert_eq!(extract_bits(rebuilt, 20, 24), 31);
    assert_eq!(extract_bits(rebuilt, 15, 19), 2, "neighbors untouched");
}

#[test]
fn place_bits_masks_excess() {
    // Only the low 3 bits of the value land in a 3-bit field.
    assert_eq!(extract_bits(place_bits(0, 4, 6, 0xFF), 4, 6), 0b111);
    assert_eq!(place_bits(0, 4, 6, 0xFF) >> 7, 0);
}

#[test]
fn sign_extend_widths() {
    assert_eq!(sign_extend(0b1111_1111_1100, 12) as i32, -4);
    assert_eq!(sign_extend(1000, 12), 1000);
    assert_eq!(sign_extend(0xF_FFFF, 20) as i32, -1);
}

#[test]
fn alignment_checks() {
    assert!(is_aligned(0x0, 4));
    assert!(is_aligned(0x10, 4));
    assert!(!is_aligned(0x4, 4));
    assert!(is_aligned(0x4, 1));
    assert!(!is_aligned(0x2, 1));
    assert_eq!(nbytes(4), 16);
}
