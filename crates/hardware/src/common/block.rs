//! Fixed-size runs of words.
//!
//! A `Block` is the unit of transfer in the memory hierarchy: caches move
//! whole blocks, and the data memory port carries one-word blocks. It
//! provides:
//! 1. **Fixed size:** A block's word count is set at construction and never changes.
//! 2. **Checked copies:** Whole-block and sub-block operations assert size agreement.
//! 3. **Indexing:** Words are addressed by word index, not byte offset.

use std::ops::{Index, IndexMut};

use crate::common::word::Word;

/// A contiguous, fixed-size sequence of 32-bit words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    words: Vec<Word>,
}

impl Block {
    /// Creates a zero-filled block of `nwords` words.
    pub fn new(nwords: usize) -> Self {
        Block {
            words: vec![Word::ZERO; nwords],
        }
    }

    /// Creates a block from unsigned word values. Test and driver convenience.
    pub fn from_u32s(values: &[u32]) -> Self {
        Block {
            words: values.iter().map(|&v| Word::from_u32(v)).collect(),
        }
    }

    /// Number of words in the block.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the block holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Overwrites this block with the contents of an equally sized block.
    ///
    /// # Panics
    ///
    /// Panics if the sizes disagree.
    pub fn copy_from(&mut self, other: &Block) {
        assert_eq!(
            self.words.len(),
            other.words.len(),
            "block sizes must agree"
        );
        self.words.copy_from_slice(&other.words);
    }

    /// Copies `len` words starting at word index `from` into a new block.
    ///
    /// # Panics
    ///
    /// Panics if `from + len` runs past the end of the block.
    pub fn subblock(&self, from: usize, len: usize) -> Block {
        assert!(
            from + len <= self.words.len(),
            "subblock [{}, {}) out of range for block of {} words",
            from,
            from + len,
            self.words.len()
        );
        Block {
            words: self.words[from..from + len].to_vec(),
        }
    }

    /// Overwrites the words starting at word index `from` with `block`.
    ///
    /// # Panics
    ///
    /// Panics if the incoming block runs past the end of this one.
    pub fn set_subblock(&mut self, from: usize, block: &Block) {
        assert!(
            from + block.len() <= self.words.len(),
            "subblock [{}, {}) out of range for block of {} words",
            from,
            from + block.len(),
            self.words.len()
        );
        self.words[from..from + block.len()].copy_from_slice(&block.words);
    }

    /// Iterates over the words in the block.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}

impl From<Vec<Word>> for Block {
    fn from(words: Vec<Word>) -> Self {
        Block { words }
    }
}

impl Index<usize> for Block {
    type Output = Word;

    fn index(&self, word_idx: usize) -> &Word {
        &self.words[word_idx]
    }
}

impl IndexMut<usize> for Block {
    fn index_mut(&mut self, word_idx: usize) -> &mut Word {
        &mut self.words[word_idx]
    }
}
