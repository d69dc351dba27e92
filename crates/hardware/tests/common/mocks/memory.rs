//! Mock of the timed memory protocol.
//!
//! Lets data-memory-unit tests script readiness cycle by cycle and verify
//! the addresses and blocks the unit hands down.

use mockall::mock;

use rv32_core::common::Block;
use rv32_core::mem::{MemoryState, TimedMemory};

mock! {
    /// Scriptable [`TimedMemory`].
    pub Memory {}

    impl TimedMemory for Memory {
        fn read_block(&mut self, addr: u32, nwords: usize) -> Option<Block>;
        fn write_block(&mut self, addr: u32, block: &Block) -> bool;
        fn state(&self) -> MemoryState;
    }
}
