//! Register file port unit.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::arch::RegisterFile;
use crate::framework::{InId, Nets, OutId, Unit, UnitId};

/// Combinational port into the shared register file.
///
/// Whenever any input changes the unit commits the pending write first and
/// then re-reads both source registers, so a write-back landing on the same
/// cycle as a decode-stage read is observed by that read.
pub struct RegisterFileUnit {
    /// First source register number.
    pub read_register1: InId,
    /// Second source register number.
    pub read_register2: InId,
    /// Destination register number from write-back.
    pub write_register: InId,
    /// Data to write from write-back.
    pub write_data: InId,
    /// Write enable from write-back.
    pub ctrl_reg_write: InId,
    /// Data read for `read_register1`.
    pub read_data1: OutId,
    /// Data read for `read_register2`.
    pub read_data2: OutId,
    regs: Rc<RefCell<RegisterFile>>,
}

impl RegisterFileUnit {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId, regs: Rc<RefCell<RegisterFile>>) -> Self {
        RegisterFileUnit {
            read_register1: nets.input(me),
            read_register2: nets.input(me),
            write_register: nets.input(me),
            write_data: nets.input(me),
            ctrl_reg_write: nets.input(me),
            read_data1: nets.output(),
            read_data2: nets.output(),
            regs,
        }
    }
}

impl Unit for RegisterFileUnit {
    fn operate(&mut self, nets: &mut Nets) {
        let mut regs = self.regs.borrow_mut();
        if !nets.read(self.ctrl_reg_write).is_zero() {
            let rd = nets.read(self.write_register).to_u32() as usize;
            regs.write_register(rd, nets.read(self.write_data));
        }
        let rs1 = nets.read(self.read_register1).to_u32() as usize;
        let rs2 = nets.read(self.read_register2).to_u32() as usize;
        let data1 = regs.read_register(rs1);
        let data2 = regs.read_register(rs2);
        drop(regs);
        nets.drive(self.read_data1, data1);
        nets.drive(self.read_data2, data2);
    }
}
