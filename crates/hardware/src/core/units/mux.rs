//! Small glue units: multiplexers, gates, and width adapters.

use crate::common::{Block, Word};
use crate::framework::{InId, Nets, OutId, Unit, UnitId, WideInId, WideOutId};

/// Two-way word multiplexer: `control == 0` selects `input0`.
pub struct Multiplexer {
    /// Selected when `control` is zero.
    pub input0: InId,
    /// Selected when `control` is nonzero.
    pub input1: InId,
    /// Select line.
    pub control: InId,
    /// Selected word.
    pub output: OutId,
}

impl Multiplexer {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        Multiplexer {
            input0: nets.input(me),
            input1: nets.input(me),
            control: nets.input(me),
            output: nets.output(),
        }
    }
}

impl Unit for Multiplexer {
    fn operate(&mut self, nets: &mut Nets) {
        let selected = if nets.read(self.control).is_zero() {
            nets.read(self.input0)
        } else {
            nets.read(self.input1)
        };
        nets.drive(self.output, selected);
    }
}

/// Boolean AND of two signals (nonzero is true).
pub struct AndGate {
    /// First operand.
    pub input0: InId,
    /// Second operand.
    pub input1: InId,
    /// 0 or 1.
    pub output: OutId,
}

impl AndGate {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        AndGate {
            input0: nets.input(me),
            input1: nets.input(me),
            output: nets.output(),
        }
    }
}

impl Unit for AndGate {
    fn operate(&mut self, nets: &mut Nets) {
        let result = !nets.read(self.input0).is_zero() && !nets.read(self.input1).is_zero();
        nets.drive(self.output, Word::from_u32(result as u32));
    }
}

/// Boolean OR of two signals (nonzero is true).
pub struct OrGate {
    /// First operand.
    pub input0: InId,
    /// Second operand.
    pub input1: InId,
    /// 0 or 1.
    pub output: OutId,
}

impl OrGate {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        OrGate {
            input0: nets.input(me),
            input1: nets.input(me),
            output: nets.output(),
        }
    }
}

impl Unit for OrGate {
    fn operate(&mut self, nets: &mut Nets) {
        let result = !nets.read(self.input0).is_zero() || !nets.read(self.input1).is_zero();
        nets.drive(self.output, Word::from_u32(result as u32));
    }
}

/// Adapts a word signal to a one-word block signal.
pub struct SignalWidener {
    /// Word side.
    pub input: InId,
    /// Block side.
    pub output: WideOutId,
    scratch: Block,
}

impl SignalWidener {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        SignalWidener {
            input: nets.input(me),
            output: nets.wide_output(1),
            scratch: Block::new(1),
        }
    }
}

impl Unit for SignalWidener {
    fn operate(&mut self, nets: &mut Nets) {
        self.scratch[0] = nets.read(self.input);
        nets.drive_wide(self.output, &self.scratch);
    }
}

/// Adapts a one-word block signal to a word signal.
pub struct SignalNarrower {
    /// Block side.
    pub input: WideInId,
    /// Word side.
    pub output: OutId,
}

impl SignalNarrower {
    /// Allocates the unit's ports in `nets`.
    pub fn new(nets: &mut Nets, me: UnitId) -> Self {
        SignalNarrower {
            input: nets.wide_input(me, 1),
            output: nets.output(),
        }
    }
}

impl Unit for SignalNarrower {
    fn operate(&mut self, nets: &mut Nets) {
        let word = nets.read_wide(self.input)[0];
        nets.drive(self.output, word);
    }
}
