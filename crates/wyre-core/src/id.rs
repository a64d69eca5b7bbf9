//! Strongly-typed identifiers, placement coordinates, and simulation time.
//!
//! All counters live on the owning [`CircuitGraph`] or engine — there is
//! no process-wide ID state. A fresh graph starts every serial at zero.
//!
//! [`CircuitGraph`]: https://docs.rs/wyre-graph

use std::fmt;

use crate::kind::GateKind;

/// Identifies a gate within a circuit.
///
/// Serials are monotonically increasing *per kind* and are never reused
/// within a graph's lifetime, so `AND-0` stays a stable key across
/// deletions. The kind is part of the identity — it is what the
/// persistence format and the host palette key on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId {
    /// The gate's kind.
    pub kind: GateKind,
    /// Monotonic serial scoped to the kind.
    pub serial: u32,
}

impl GateId {
    /// Construct an ID from its parts.
    pub fn new(kind: GateKind, serial: u32) -> Self {
        Self { kind, serial }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.serial)
    }
}

/// Identifies a connector (an input or output terminal on a gate).
///
/// Allocated from the owning graph's monotonic counter; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(pub u64);

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ConnectorId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a connection (a directed edge between two connectors).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ConnectionId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A point on the engine's virtual clock, in milliseconds.
///
/// The propagation engine advances this clock from one scheduled
/// delivery to the next; the realtime driver maps one virtual
/// millisecond to one wall millisecond.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimTime(pub u64);

impl SimTime {
    /// The clock origin.
    pub const ZERO: SimTime = SimTime(0);

    /// This instant plus a delay in milliseconds, saturating.
    pub fn after(self, delay_ms: u64) -> Self {
        Self(self.0.saturating_add(delay_ms))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<u64> for SimTime {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A placement coordinate on the host's canvas.
///
/// Carried through the data model and the persistence format for the
/// host renderer's benefit; the engine itself never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Construct a position from its parts.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_id_display() {
        let id = GateId::new(GateKind::And, 3);
        assert_eq!(id.to_string(), "AND-3");
    }

    #[test]
    fn sim_time_after_saturates() {
        assert_eq!(SimTime(10).after(5), SimTime(15));
        assert_eq!(SimTime(u64::MAX).after(1), SimTime(u64::MAX));
    }

    #[test]
    fn ids_order_by_value() {
        assert!(ConnectorId(1) < ConnectorId(2));
        assert!(SimTime(1) < SimTime(2));
    }
}
