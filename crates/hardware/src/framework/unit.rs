//! The unit abstraction.
//!
//! Every piece of logic in the datapath is a *unit* with input and output
//! signals. A unit's scheduling role decides when its `operate` runs:
//! 1. **Combinational:** re-operates whenever any input changes, by event propagation.
//! 2. **Clocked:** operates once per cycle, in the clock phase.
//! 3. **BufferedClocked:** clocked, but latches from a shadow copy of its
//!    inputs captured before any clocked unit runs, so clocked units may be
//!    evaluated in any order within a cycle.
//! 4. **Priority:** operates once per cycle, before buffering and clocking;
//!    used by hazard detection and forwarding.

use crate::framework::signal::Nets;

/// Scheduling role of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Re-operates immediately when any synced input changes.
    Combinational,
    /// Operates once per cycle in the clock phase; input changes do not
    /// trigger it.
    Clocked,
    /// Clocked, with inputs captured into a shadow copy in the buffering
    /// phase.
    BufferedClocked,
    /// Operates once per cycle before the buffering phase. Reads pipeline
    /// register inputs directly instead of owning combinational wires.
    Priority,
}

/// A piece of logic connected to the signal nets.
///
/// `operate` is the unit's only computation entry point. For combinational
/// units it must be a pure function of the current input words; it may run
/// arbitrarily often per cycle.
pub trait Unit {
    /// Computes outputs from the current inputs (and any owned state, for
    /// clocked units).
    fn operate(&mut self, nets: &mut Nets);

    /// Captures the current input words into the unit's shadow copy.
    ///
    /// Only meaningful for [`Role::BufferedClocked`] units; the default
    /// implementation does nothing.
    fn buffer_inputs(&mut self, nets: &mut Nets) {
        let _ = nets;
    }
}
