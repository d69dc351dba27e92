//! Timed memory hierarchy.
//!
//! This module models memories whose accesses take a configurable number of
//! cycles. It provides:
//! 1. **`TimedMemory`:** The polymorphic access protocol. Each access is a
//!    multi-cycle transaction re-invoked once per cycle until it reports
//!    completion; "not ready" is a value in the protocol, not an error.
//! 2. **`TimedMainMemory`:** Flat byte-addressable storage with a fixed latency.
//! 3. **`TimedCache`:** A set-associative cache chained to a lower memory,
//!    with configurable write scheme and replacement policy.
//!
//! State-machine violations (changing the address mid-access, reading while
//! a write is in flight) are fatal assertions: they indicate a bug in the
//! driver, not a runtime condition to handle.

/// Set-associative cache with write-through/write-back and LRU policies.
pub mod cache;
/// Flat storage with a fixed access latency.
pub mod main_memory;

pub use cache::TimedCache;
pub use main_memory::TimedMainMemory;

use crate::common::Block;

/// Progress state of a timed memory.
///
/// A memory is `Ready` when no access is in flight; it transitions back to
/// `Ready` only on the cycle the access completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryState {
    /// No access in progress.
    Ready,
    /// A read transaction is in progress.
    Reading,
    /// A write transaction is in progress.
    Writing,
}

/// A memory whose accesses take one or more cycles.
///
/// The caller invokes `read_block`/`write_block` once per cycle with the
/// same arguments until the access completes. At most one access may be in
/// progress; an in-progress read cannot be pre-empted by a write nor vice
/// versa.
pub trait TimedMemory {
    /// Advances a read of `nwords` words at byte address `addr` by one cycle.
    ///
    /// Returns `Some(block)` on the completing cycle, `None` otherwise.
    ///
    /// # Panics
    ///
    /// Panics if a write is in progress, if the address is not aligned to
    /// the requested width, or if a continuation changes the address or
    /// length.
    fn read_block(&mut self, addr: u32, nwords: usize) -> Option<Block>;

    /// Advances a write of `block` at byte address `addr` by one cycle.
    ///
    /// Returns `true` on the completing cycle; storage is committed on that
    /// cycle and not before.
    ///
    /// # Panics
    ///
    /// Panics if a read is in progress, if the address is not aligned, or if
    /// a continuation changes the address or the submitted block.
    fn write_block(&mut self, addr: u32, block: &Block) -> bool;

    /// Current progress state.
    fn state(&self) -> MemoryState;

    /// Instantaneous analog of [`TimedMemory::read_block`] that spins the
    /// transaction to completion. Test and driver code only.
    fn read_block_now(&mut self, addr: u32, nwords: usize) -> Block {
        loop {
            if let Some(block) = self.read_block(addr, nwords) {
                return block;
            }
        }
    }

    /// Instantaneous analog of [`TimedMemory::write_block`]. Test and driver
    /// code only.
    fn write_block_now(&mut self, addr: u32, block: &Block) {
        while !self.write_block(addr, block) {}
    }
}
