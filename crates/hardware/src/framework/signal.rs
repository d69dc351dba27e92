//! Signal nets: the wires between units.
//!
//! Signals form an arena owned by the processor. An *output* signal stores a
//! word and a fanout list of *input* signals; an input signal stores the last
//! word written to it and a back reference to the unit it belongs to. The
//! module provides:
//! 1. **Wiring:** `connect` appends an input to an output's fanout; each
//!    input may be synced to at most one output.
//! 2. **Propagation:** `drive` copies the word into every synced input and
//!    schedules the owning unit's `operate` when that unit is combinational.
//! 3. **Wide variants:** block-valued outputs and inputs with identical
//!    semantics, used at the data memory port.
//!
//! Driving a signal outside of `operate` is legal only for initial wiring
//! and for poking boot values before the first cycle.

use std::collections::VecDeque;

use crate::common::{Block, Word};
use crate::framework::unit::Role;

/// Handle to a registered unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitId(pub(crate) usize);

/// Handle to a word-valued output signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutId(usize);

/// Handle to a word-valued input signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InId(usize);

/// Handle to a block-valued output signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WideOutId(usize);

/// Handle to a block-valued input signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WideInId(usize);

struct OutState {
    value: Word,
    fanout: Vec<InId>,
}

struct InState {
    value: Word,
    owner: UnitId,
    synced: bool,
}

struct WideOutState {
    value: Block,
    fanout: Vec<WideInId>,
}

struct WideInState {
    value: Block,
    owner: UnitId,
    synced: bool,
}

/// The signal arena.
///
/// Units hold `OutId`/`InId` handles into the arena instead of references to
/// each other; the combinational propagation queue lives here so a unit can
/// drive its outputs while the processor drains the resulting work.
pub struct Nets {
    outputs: Vec<OutState>,
    inputs: Vec<InState>,
    wide_outputs: Vec<WideOutState>,
    wide_inputs: Vec<WideInState>,
    roles: Vec<Role>,
    pending: VecDeque<UnitId>,
}

impl Nets {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Nets {
            outputs: Vec::new(),
            inputs: Vec::new(),
            wide_outputs: Vec::new(),
            wide_inputs: Vec::new(),
            roles: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Registers a unit slot with the given scheduling role.
    ///
    /// The returned id is used both to own input signals and to install the
    /// unit in the processor's scheduling lists.
    pub fn add_unit(&mut self, role: Role) -> UnitId {
        self.roles.push(role);
        UnitId(self.roles.len() - 1)
    }

    /// Allocates a word-valued output signal, initially zero.
    pub fn output(&mut self) -> OutId {
        self.outputs.push(OutState {
            value: Word::ZERO,
            fanout: Vec::new(),
        });
        OutId(self.outputs.len() - 1)
    }

    /// Allocates a word-valued input signal owned by `owner`, initially zero.
    pub fn input(&mut self, owner: UnitId) -> InId {
        self.inputs.push(InState {
            value: Word::ZERO,
            owner,
            synced: false,
        });
        InId(self.inputs.len() - 1)
    }

    /// Allocates a block-valued output signal of `width` words.
    pub fn wide_output(&mut self, width: usize) -> WideOutId {
        self.wide_outputs.push(WideOutState {
            value: Block::new(width),
            fanout: Vec::new(),
        });
        WideOutId(self.wide_outputs.len() - 1)
    }

    /// Allocates a block-valued input signal of `width` words owned by `owner`.
    pub fn wide_input(&mut self, owner: UnitId, width: usize) -> WideInId {
        self.wide_inputs.push(WideInState {
            value: Block::new(width),
            owner,
            synced: false,
        });
        WideInId(self.wide_inputs.len() - 1)
    }

    /// Syncs `input` to `out`, appending it to the output's fanout.
    ///
    /// # Panics
    ///
    /// Panics if the input is already synced to an output.
    pub fn connect(&mut self, out: OutId, input: InId) {
        assert!(
            !self.inputs[input.0].synced,
            "input signal wired to more than one output"
        );
        self.inputs[input.0].synced = true;
        self.outputs[out.0].fanout.push(input);
    }

    /// Syncs a block-valued `input` to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the input is already synced, or if the widths disagree.
    pub fn connect_wide(&mut self, out: WideOutId, input: WideInId) {
        assert!(
            !self.wide_inputs[input.0].synced,
            "wide input signal wired to more than one output"
        );
        assert_eq!(
            self.wide_outputs[out.0].value.len(),
            self.wide_inputs[input.0].value.len(),
            "wide signal widths must agree"
        );
        self.wide_inputs[input.0].synced = true;
        self.wide_outputs[out.0].fanout.push(input);
    }

    /// Sets the output's word, copies it into every synced input, and
    /// schedules the owning unit of each combinational input for `operate`.
    pub fn drive(&mut self, out: OutId, value: Word) {
        self.outputs[out.0].value = value;
        for i in 0..self.outputs[out.0].fanout.len() {
            let input = self.outputs[out.0].fanout[i];
            self.inputs[input.0].value = value;
            self.notify(self.inputs[input.0].owner);
        }
    }

    /// Block-valued counterpart of [`Nets::drive`].
    pub fn drive_wide(&mut self, out: WideOutId, value: &Block) {
        self.wide_outputs[out.0].value.copy_from(value);
        for i in 0..self.wide_outputs[out.0].fanout.len() {
            let input = self.wide_outputs[out.0].fanout[i];
            self.wide_inputs[input.0].value.copy_from(value);
            self.notify(self.wide_inputs[input.0].owner);
        }
    }

    /// Current word of an input signal.
    pub fn read(&self, input: InId) -> Word {
        self.inputs[input.0].value
    }

    /// Current word of an output signal (the last value driven).
    pub fn read_out(&self, out: OutId) -> Word {
        self.outputs[out.0].value
    }

    /// Current block of a wide input signal.
    pub fn read_wide(&self, input: WideInId) -> &Block {
        &self.wide_inputs[input.0].value
    }

    /// Current block of a wide output signal (the last value driven).
    pub fn read_wide_out(&self, out: WideOutId) -> &Block {
        &self.wide_outputs[out.0].value
    }

    /// Overwrites an input signal's stored word without any propagation.
    ///
    /// This is the forwarding path: the forwarding unit rewrites a pipeline
    /// register's `*_in` word before the register buffers and latches it.
    pub fn poke(&mut self, input: InId, value: Word) {
        self.inputs[input.0].value = value;
    }

    fn notify(&mut self, owner: UnitId) {
        if self.roles[owner.0] == Role::Combinational {
            self.pending.push_back(owner);
        }
    }

    /// Removes and returns the next unit scheduled by propagation.
    pub(crate) fn take_pending(&mut self) -> Option<UnitId> {
        self.pending.pop_front()
    }
}

impl Default for Nets {
    fn default() -> Self {
        Nets::new()
    }
}
