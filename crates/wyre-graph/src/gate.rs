//! Gates: the logic units of a circuit.

use smallvec::SmallVec;

use wyre_core::{ConnectorId, GateId, GateKind, Position, Signal};

/// A logic unit with up to two inputs and up to two outputs.
///
/// The connector lists are ordered: slot order is what the persistence
/// format keys on and what the host renderer labels `in1`/`in2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    /// Unique ID (kind plus per-kind serial).
    pub id: GateId,
    /// Placement on the host canvas; never interpreted by the engine.
    pub position: Position,
    /// Input connectors, in slot order. Empty for `Input` gates.
    pub inputs: SmallVec<[ConnectorId; 2]>,
    /// Output connectors, in slot order. Empty for `Output` gates.
    pub outputs: SmallVec<[ConnectorId; 2]>,
    /// The externally toggled source level of an `Input` gate.
    ///
    /// Survives circuit reset (reset clears connector values, not the
    /// toggle — seeding re-reads it). `Unset` and meaningless for every
    /// other kind.
    pub level: Signal,
}

impl Gate {
    /// The gate's kind (carried inside the ID).
    pub fn kind(&self) -> GateKind {
        self.id.kind
    }
}
