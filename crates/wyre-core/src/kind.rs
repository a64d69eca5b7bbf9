//! Gate kinds and the evaluation table.
//!
//! Every gate is a [`GateKind`] tag plus per-kind arity; evaluation is
//! a single `match` over the tag rather than one type per kind. The
//! table is total and pure over `{Unset, Low, High}` — undriven inputs
//! coerce to false and no combination of inputs can fail.

use smallvec::{smallvec, SmallVec};
use std::fmt;

use crate::signal::Signal;

/// Output values produced by one gate evaluation.
///
/// At most two entries (the splitter); inline, no heap allocation.
pub type Outputs = SmallVec<[Signal; 2]>;

/// The kind of a logic gate.
///
/// `Input` and `Output` are the circuit's boundary: an `Input` gate has
/// no input connectors and its output level is set directly by the
/// host; an `Output` gate has no output connectors and exists only to
/// display the value arriving at its input. `Splitter` is pure fan-out:
/// both outputs mirror the single input unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateKind {
    /// Source gate; output driven by an external toggle.
    Input,
    /// Sink gate; displays its input, drives nothing.
    Output,
    /// ¬a
    Not,
    /// a ∧ b
    And,
    /// a ∨ b
    Or,
    /// ¬(a ∧ b)
    Nand,
    /// ¬(a ∨ b)
    Nor,
    /// a ⊕ b
    Xor,
    /// ¬(a ⊕ b)
    Xnor,
    /// One input mirrored to two outputs.
    Splitter,
}

/// Every gate kind, in palette order.
pub const ALL_KINDS: [GateKind; 10] = [
    GateKind::Input,
    GateKind::Output,
    GateKind::Not,
    GateKind::And,
    GateKind::Or,
    GateKind::Nand,
    GateKind::Nor,
    GateKind::Xor,
    GateKind::Xnor,
    GateKind::Splitter,
];

impl GateKind {
    /// Number of input connectors a gate of this kind carries.
    pub fn input_count(self) -> usize {
        match self {
            Self::Input => 0,
            Self::Output | Self::Not | Self::Splitter => 1,
            Self::And | Self::Or | Self::Nand | Self::Nor | Self::Xor | Self::Xnor => 2,
        }
    }

    /// Number of output connectors a gate of this kind carries.
    pub fn output_count(self) -> usize {
        match self {
            Self::Output => 0,
            Self::Splitter => 2,
            _ => 1,
        }
    }

    /// Evaluate the gate function over the given input values.
    ///
    /// Total and side-effect free: missing or `Unset` inputs read as
    /// false, surplus inputs are ignored, and every kind yields exactly
    /// [`output_count()`](GateKind::output_count) values. `Input` and
    /// `Output` derive nothing from their inputs — `Input` levels are
    /// externally toggled and `Output` is a display sink — so both
    /// return an empty result here.
    pub fn eval(self, inputs: &[Signal]) -> Outputs {
        let a = inputs.first().copied().unwrap_or(Signal::Unset).as_bool();
        let b = inputs.get(1).copied().unwrap_or(Signal::Unset).as_bool();
        match self {
            Self::Input | Self::Output => smallvec![],
            Self::Not => smallvec![Signal::from_bool(!a)],
            Self::And => smallvec![Signal::from_bool(a && b)],
            Self::Or => smallvec![Signal::from_bool(a || b)],
            Self::Nand => smallvec![Signal::from_bool(!(a && b))],
            Self::Nor => smallvec![Signal::from_bool(!(a || b))],
            Self::Xor => smallvec![Signal::from_bool(a ^ b)],
            Self::Xnor => smallvec![Signal::from_bool(!(a ^ b))],
            Self::Splitter => {
                let v = inputs.first().copied().unwrap_or(Signal::Unset);
                smallvec![v, v]
            }
        }
    }

    /// Stable token for this kind, used by the persistence codec and
    /// configuration keys.
    pub fn code(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Xnor => "XNOR",
            Self::Splitter => "SPLITTER",
        }
    }

    /// Parse a kind token produced by [`code()`](GateKind::code).
    pub fn parse(token: &str) -> Option<Self> {
        ALL_KINDS.into_iter().find(|k| k.code() == token)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
