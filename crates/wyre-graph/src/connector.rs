//! Connectors: the typed terminals on a gate.

use std::fmt;

use wyre_core::{ConnectorId, GateId, Signal};

/// Whether a connector receives or drives signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Receives signal; at most one incoming connection.
    Input,
    /// Drives signal; any number of outgoing connections.
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A terminal on a gate, carrying the current tri-state value.
///
/// Created and destroyed with its owning gate. The value is mutated
/// only by the propagation engine (deliveries and seeding) — structural
/// edits either leave it alone or clear it back to `Unset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    /// Unique ID within the graph.
    pub id: ConnectorId,
    /// Input or output.
    pub direction: Direction,
    /// The gate this terminal belongs to.
    pub gate: GateId,
    /// The current signal value.
    pub value: Signal,
}
