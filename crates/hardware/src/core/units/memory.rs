//! Instruction and data memory port units.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::Word;
use crate::framework::{InId, Nets, OutId, Unit, UnitId, WideInId, WideOutId};
use crate::mem::{MemoryState, TimedMainMemory, TimedMemory};

/// Combinational instruction fetch port.
///
/// The backing store is a 1-cycle `TimedMainMemory`, but the fetch stage
/// treats it as zero-latency and reads storage directly.
pub struct InstructionMemoryUnit {
    /// Fetch address (the issue unit's PC).
    pub address: InId,
    /// The fetched instruction word.
    pub instruction: OutId,
    memory: Rc<RefCell<TimedMainMemory>>,
}

impl InstructionMemoryUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId, memory: Rc<RefCell<TimedMainMemory>>) -> Self {
        InstructionMemoryUnit {
            address: nets.input(me),
            instruction: nets.output(),
            memory,
        }
    }
}

impl Unit for InstructionMemoryUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let addr = nets.read(self.address).to_u32();
        let word = self.memory.borrow().peek_word(addr);
        nets.drive(self.instruction, word);
    }
}

/// Clocked data memory port wrapping the timed hierarchy.
///
/// Each cycle the unit advances at most one transaction on the underlying
/// memory and reports readiness; the memory hazard unit turns `is_ready = 0`
/// into upstream freezes, which hold the address and controls stable until
/// the transaction completes.
pub struct DataMemoryUnit {
    /// Byte address from the execute stage's ALU.
    pub address: InId,
    /// One-word block to store.
    pub write_data: WideInId,
    /// Read enable.
    pub ctrl_mem_read: InId,
    /// Write enable.
    pub ctrl_mem_write: InId,
    /// One-word block read from memory; valid when `is_ready` is 1.
    pub read_data: WideOutId,
    /// 0 while a transaction is still in flight.
    pub is_ready: OutId,
    memory: Rc<RefCell<dyn TimedMemory>>,
}

impl DataMemoryUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId, memory: Rc<RefCell<dyn TimedMemory>>) -> Self {
        DataMemoryUnit {
            address: nets.input(me),
            write_data: nets.wide_input(me, 1),
            ctrl_mem_read: nets.input(me),
            ctrl_mem_write: nets.input(me),
            read_data: nets.wide_output(1),
            is_ready: nets.output(),
            memory,
        }
    }
}

impl Unit for DataMemoryUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let addr = nets.read(self.address).to_u32();
        if !nets.read(self.ctrl_mem_read).is_zero() {
            match self.memory.borrow_mut().read_block(addr, 1) {
                Some(block) => {
                    nets.drive_wide(self.read_data, &block);
                    nets.drive(self.is_ready, Word::from_u32(1));
                }
                None => nets.drive(self.is_ready, Word::ZERO),
            }
        } else if !nets.read(self.ctrl_mem_write).is_zero() {
            let block = nets.read_wide(self.write_data).clone();
            let done = self.memory.borrow_mut().write_block(addr, &block);
            nets.drive(self.is_ready, Word::from_u32(done as u32));
        } else {
            assert!(
                self.memory.borrow().state() == MemoryState::Ready,
                "data memory left mid-transaction with no memory operation in flight"
            );
            nets.drive(self.is_ready, Word::from_u32(1));
        }
    }
}
