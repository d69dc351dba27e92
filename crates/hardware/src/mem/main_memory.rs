//! Flat main memory with a fixed access latency.

use crate::common::bits::{is_aligned, nbytes};
use crate::common::{Block, Word};
use crate::mem::{MemoryState, TimedMemory};

/// One in-flight transaction.
struct Access {
    addr: u32,
    nwords: usize,
    /// Data submitted with a write; `None` for reads.
    data: Option<Block>,
    elapsed: u64,
}

/// Byte-addressable storage of `2^address_space_bits` bytes where every
/// access takes `latency` cycles.
///
/// The first `latency - 1` invocations of an access report "not ready"; the
/// access completes (and a write commits) on invocation `latency`.
pub struct TimedMainMemory {
    /// Address space size in bits.
    pub address_space_bits: usize,
    /// Access latency in cycles.
    pub latency: u64,
    storage: Block,
    state: MemoryState,
    access: Option<Access>,
}

impl TimedMainMemory {
    /// Creates a zeroed memory.
    ///
    /// # Arguments
    ///
    /// * `address_space_bits` - Size of the address space in bits (at least 2).
    /// * `latency` - Cycles per access (at least 1).
    pub fn new(address_space_bits: usize, latency: u64) -> Self {
        assert!(address_space_bits >= 2, "address space must hold a word");
        assert!(latency >= 1, "memory latency must be at least one cycle");
        TimedMainMemory {
            address_space_bits,
            latency,
            storage: Block::new(1 << (address_space_bits - 2)),
            state: MemoryState::Ready,
            access: None,
        }
    }

    /// Reads one word directly from storage, bypassing the timing model.
    ///
    /// Used by the fetch stage (instruction memory is treated as
    /// combinational) and by read-only views.
    ///
    /// # Panics
    ///
    /// Panics on an unaligned or out-of-range address.
    pub fn peek_word(&self, addr: u32) -> Word {
        self.check_bounds(addr, 1);
        self.storage[(addr >> 2) as usize]
    }

    /// Writes one word directly into storage, bypassing the timing model.
    ///
    /// Used by the driver to pre-load programs and data before cycle 1.
    ///
    /// # Panics
    ///
    /// Panics on an unaligned or out-of-range address.
    pub fn poke_word(&mut self, addr: u32, word: Word) {
        self.check_bounds(addr, 1);
        self.storage[(addr >> 2) as usize] = word;
    }

    /// Number of words in the backing storage.
    pub fn len_words(&self) -> usize {
        self.storage.len()
    }

    fn check_bounds(&self, addr: u32, nwords: usize) {
        assert!(
            is_aligned(addr, nwords),
            "address {:#x} is not aligned to {} words",
            addr,
            nwords
        );
        assert!(
            addr as usize + nbytes(nwords) <= 1 << self.address_space_bits,
            "access at {:#x} runs past the {}-bit address space",
            addr,
            self.address_space_bits
        );
    }
}

impl TimedMemory for TimedMainMemory {
    fn read_block(&mut self, addr: u32, nwords: usize) -> Option<Block> {
        assert!(
            self.state != MemoryState::Writing,
            "read issued while a write is in progress"
        );
        if self.state == MemoryState::Ready {
            self.check_bounds(addr, nwords);
            self.state = MemoryState::Reading;
            self.access = Some(Access {
                addr,
                nwords,
                data: None,
                elapsed: 0,
            });
        }
        let access = self.access.as_mut().expect("reading state implies an access");
        assert!(
            access.addr == addr && access.nwords == nwords,
            "a read in progress must be continued with the same address and length"
        );
        access.elapsed += 1;
        if access.elapsed < self.latency {
            return None;
        }
        self.access = None;
        self.state = MemoryState::Ready;
        Some(self.storage.subblock((addr >> 2) as usize, nwords))
    }

    fn write_block(&mut self, addr: u32, block: &Block) -> bool {
        assert!(
            self.state != MemoryState::Reading,
            "write issued while a read is in progress"
        );
        if self.state == MemoryState::Ready {
            self.check_bounds(addr, block.len());
            self.state = MemoryState::Writing;
            self.access = Some(Access {
                addr,
                nwords: block.len(),
                data: Some(block.clone()),
                elapsed: 0,
            });
        }
        let access = self.access.as_mut().expect("writing state implies an access");
        assert!(
            access.addr == addr && access.data.as_ref() == Some(block),
            "a write in progress must be continued with the same address and block"
        );
        access.elapsed += 1;
        if access.elapsed < self.latency {
            return false;
        }
        self.storage.set_subblock((addr >> 2) as usize, block);
        self.access = None;
        self.state = MemoryState::Ready;
        true
    }

    fn state(&self) -> MemoryState {
        self.state
    }
}
