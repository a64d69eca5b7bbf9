//! The circuit graph: live gates and connections, validation, topology.
//!
//! All stores are `IndexMap`s keyed by ID — O(1) lookup with
//! deterministic (insertion-order) iteration, so host snapshots render
//! stably. Two adjacency indices are maintained alongside the
//! connection store:
//!
//! - `incoming`: input connector → the single connection driving it
//!   (the occupancy check behind `TargetOccupied`).
//! - `outgoing`: output connector → every connection fanned out from it
//!   (the delivery-scheduling query on the propagation hot path).
//!
//! Structural edits never propagate signal; they only mutate the graph
//! and report what changed so the engine can reschedule.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use wyre_core::{ConnectError, ConnectionId, ConnectorId, GateId, GateKind, Position, Signal};

use crate::connection::Connection;
use crate::connector::{Connector, Direction};
use crate::gate::Gate;

// ── RemovedGate ─────────────────────────────────────────────────

/// Everything severed by a gate deletion.
///
/// The engine uses this to purge scheduled deliveries for the severed
/// connections and to re-evaluate the downstream gates that just lost
/// a driver (their freed inputs read `Unset` from now on).
#[derive(Debug)]
pub struct RemovedGate {
    /// The deleted gate record.
    pub gate: Gate,
    /// Every connection that touched the deleted gate.
    pub connections: Vec<Connection>,
    /// Surviving gates whose input was fed by the deleted gate.
    pub downstream: Vec<GateId>,
}

// ── CircuitGraph ────────────────────────────────────────────────

/// The set of all live gates, connectors, and connections.
///
/// Owns every ID counter — serials are scoped to this graph, never
/// process-wide, and are not reused after deletion.
#[derive(Debug, Default)]
pub struct CircuitGraph {
    gates: IndexMap<GateId, Gate>,
    connectors: IndexMap<ConnectorId, Connector>,
    connections: IndexMap<ConnectionId, Connection>,
    incoming: IndexMap<ConnectorId, ConnectionId>,
    outgoing: IndexMap<ConnectorId, SmallVec<[ConnectionId; 2]>>,
    next_serial: IndexMap<GateKind, u32>,
    next_connector: u64,
    next_connection: u64,
}

impl CircuitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Gate lifecycle ──────────────────────────────────────────

    /// Place a new gate, allocating its per-kind serial and connectors.
    ///
    /// Allowance enforcement is the simulation controller's job; the
    /// graph itself accepts any kind.
    pub fn add_gate(&mut self, kind: GateKind, position: Position) -> GateId {
        let serial = *self.next_serial.entry(kind).or_insert(0);
        self.insert_gate(kind, serial, position)
    }

    /// Insert a gate with an explicit serial (persistence decode path).
    ///
    /// Bumps the per-kind counter past `serial` so later placements
    /// never collide. Returns `None` if the serial is already live.
    pub(crate) fn insert_gate_with_serial(
        &mut self,
        kind: GateKind,
        serial: u32,
        position: Position,
    ) -> Option<GateId> {
        if self.gates.contains_key(&GateId::new(kind, serial)) {
            return None;
        }
        Some(self.insert_gate(kind, serial, position))
    }

    fn insert_gate(&mut self, kind: GateKind, serial: u32, position: Position) -> GateId {
        let id = GateId::new(kind, serial);
        let next = self.next_serial.entry(kind).or_insert(0);
        *next = (*next).max(serial.saturating_add(1));

        let mut inputs = SmallVec::new();
        for _ in 0..kind.input_count() {
            inputs.push(self.new_connector(id, Direction::Input));
        }
        let mut outputs = SmallVec::new();
        for _ in 0..kind.output_count() {
            outputs.push(self.new_connector(id, Direction::Output));
        }

        self.gates.insert(
            id,
            Gate {
                id,
                position,
                inputs,
                outputs,
                level: Signal::Unset,
            },
        );
        id
    }

    fn new_connector(&mut self, gate: GateId, direction: Direction) -> ConnectorId {
        let id = ConnectorId(self.next_connector);
        self.next_connector += 1;
        self.connectors.insert(
            id,
            Connector {
                id,
                direction,
                gate,
                value: Signal::Unset,
            },
        );
        id
    }

    /// Delete a gate, cascading over its connections and connectors.
    ///
    /// Surviving targets of severed connections are cleared to `Unset`
    /// (their driver is gone). Returns `None` if the gate is unknown.
    pub fn remove_gate(&mut self, id: GateId) -> Option<RemovedGate> {
        let gate = self.gates.shift_remove(&id)?;

        let mut severed = Vec::new();
        // IndexSet: a gate fed twice by the deleted gate (splitter into
        // both inputs) must appear once, in first-encounter order.
        let mut downstream: IndexSet<GateId> = IndexSet::new();
        for conn_id in self.connections_of_gate_record(&gate) {
            if let Some(conn) = self.remove_connection(conn_id) {
                if let Some(target) = self.connectors.get_mut(&conn.target) {
                    if target.gate != id {
                        target.value = Signal::Unset;
                        downstream.insert(target.gate);
                    }
                }
                severed.push(conn);
            }
        }

        for connector in gate.inputs.iter().chain(gate.outputs.iter()) {
            self.connectors.shift_remove(connector);
        }

        Some(RemovedGate {
            gate,
            connections: severed,
            downstream: downstream.into_iter().collect(),
        })
    }

    // ── Connection lifecycle ────────────────────────────────────

    /// Validate and create a connection between two connectors.
    ///
    /// The pick order is the two-click UI flow: if the user chose the
    /// input first, the endpoints are normalized so `source` is always
    /// the output. Rejection mutates nothing:
    ///
    /// - [`ConnectError::SameDirection`] — two inputs or two outputs.
    /// - [`ConnectError::SelfConnection`] — both ends on one gate.
    /// - [`ConnectError::TargetOccupied`] — the input already has a
    ///   driver; the existing connection is never replaced.
    /// - [`ConnectError::UnknownConnector`] — an ID did not resolve.
    ///
    /// On success the new edge is returned for the engine to pick up on
    /// its next pass — no value moves inline.
    pub fn try_connect(
        &mut self,
        a: ConnectorId,
        b: ConnectorId,
    ) -> Result<ConnectionId, ConnectError> {
        let first = self
            .connectors
            .get(&a)
            .ok_or(ConnectError::UnknownConnector { id: a })?;
        let second = self
            .connectors
            .get(&b)
            .ok_or(ConnectError::UnknownConnector { id: b })?;

        let (source, target) = match (first.direction, second.direction) {
            (Direction::Output, Direction::Input) => (first, second),
            (Direction::Input, Direction::Output) => (second, first),
            _ => return Err(ConnectError::SameDirection),
        };
        if source.gate == target.gate {
            return Err(ConnectError::SelfConnection { gate: source.gate });
        }
        if let Some(existing) = self.incoming.get(&target.id) {
            return Err(ConnectError::TargetOccupied {
                target: target.id,
                existing: *existing,
            });
        }

        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        let conn = Connection {
            id,
            source: source.id,
            target: target.id,
        };
        self.incoming.insert(conn.target, id);
        self.outgoing.entry(conn.source).or_default().push(id);
        self.connections.insert(id, conn);
        Ok(id)
    }

    /// Delete a connection, clearing the orphaned target to `Unset`.
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.remove_connection(id)?;
        if let Some(target) = self.connectors.get_mut(&conn.target) {
            target.value = Signal::Unset;
        }
        Some(conn)
    }

    fn remove_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.connections.shift_remove(&id)?;
        self.incoming.shift_remove(&conn.target);
        if let Some(fanout) = self.outgoing.get_mut(&conn.source) {
            fanout.retain(|c| *c != id);
            if fanout.is_empty() {
                self.outgoing.shift_remove(&conn.source);
            }
        }
        Some(conn)
    }

    // ── Topology queries ────────────────────────────────────────

    /// The gate owning a connector.
    pub fn owner_of(&self, connector: ConnectorId) -> Option<GateId> {
        self.connectors.get(&connector).map(|c| c.gate)
    }

    /// Every connection fanned out from an output connector.
    pub fn fanout(&self, connector: ConnectorId) -> &[ConnectionId] {
        self.outgoing
            .get(&connector)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The connection currently driving an input connector, if any.
    pub fn incoming(&self, connector: ConnectorId) -> Option<ConnectionId> {
        self.incoming.get(&connector).copied()
    }

    /// Every connection whose source or target belongs to the gate.
    pub fn connections_of_gate(&self, id: GateId) -> Vec<ConnectionId> {
        self.gates
            .get(&id)
            .map(|g| self.connections_of_gate_record(g))
            .unwrap_or_default()
    }

    fn connections_of_gate_record(&self, gate: &Gate) -> Vec<ConnectionId> {
        let mut ids = Vec::new();
        for output in &gate.outputs {
            ids.extend_from_slice(self.fanout(*output));
        }
        for input in &gate.inputs {
            if let Some(conn) = self.incoming.get(input) {
                ids.push(*conn);
            }
        }
        ids
    }

    /// Every `Input`-kind gate — the entry points for seeding.
    pub fn input_gates(&self) -> Vec<GateId> {
        self.gates
            .keys()
            .filter(|id| id.kind == GateKind::Input)
            .copied()
            .collect()
    }

    /// Count of live gates of the given kind (allowance checks).
    pub fn count_of_kind(&self, kind: GateKind) -> usize {
        self.gates.keys().filter(|id| id.kind == kind).count()
    }

    // ── State access ────────────────────────────────────────────

    /// Look up a gate record.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    /// Look up a connector record.
    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Look up a connection record.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All live gates, in placement order (read-only host snapshot).
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    /// All live connections, in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of live gates.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// A connector's current value.
    pub fn value(&self, connector: ConnectorId) -> Option<Signal> {
        self.connectors.get(&connector).map(|c| c.value)
    }

    /// Overwrite a connector's value, returning the previous one.
    ///
    /// Called by the propagation engine only (deliveries and seeding).
    pub fn set_value(&mut self, connector: ConnectorId, value: Signal) -> Option<Signal> {
        let c = self.connectors.get_mut(&connector)?;
        Some(std::mem::replace(&mut c.value, value))
    }

    /// The current input-connector values of a gate, in slot order.
    pub fn input_values(&self, id: GateId) -> SmallVec<[Signal; 2]> {
        self.gates
            .get(&id)
            .map(|g| {
                g.inputs
                    .iter()
                    .map(|c| self.value(*c).unwrap_or(Signal::Unset))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store the externally toggled level of an `Input` gate.
    ///
    /// The toggle survives circuit reset; seeding reads it back. Kind
    /// validation is the controller's job.
    pub fn set_level(&mut self, id: GateId, level: Signal) -> bool {
        match self.gates.get_mut(&id) {
            Some(gate) => {
                gate.level = level;
                true
            }
            None => false,
        }
    }

    /// Clear every connector back to `Unset`.
    ///
    /// Input-gate toggle levels are preserved — reset wipes wire state,
    /// not authored state.
    pub fn reset_values(&mut self) {
        for connector in self.connectors.values_mut() {
            connector.value = Signal::Unset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn and_with_sources() -> (CircuitGraph, GateId, GateId, GateId) {
        let mut g = CircuitGraph::new();
        let a = g.add_gate(GateKind::Input, Position::new(0, 0));
        let b = g.add_gate(GateKind::Input, Position::new(0, 40));
        let and = g.add_gate(GateKind::And, Position::new(100, 20));
        (g, a, b, and)
    }

    fn out0(g: &CircuitGraph, id: GateId) -> ConnectorId {
        g.gate(id).unwrap().outputs[0]
    }

    fn in_slot(g: &CircuitGraph, id: GateId, slot: usize) -> ConnectorId {
        g.gate(id).unwrap().inputs[slot]
    }

    #[test]
    fn gate_serials_are_scoped_to_kind() {
        let mut g = CircuitGraph::new();
        let a = g.add_gate(GateKind::And, Position::default());
        let o = g.add_gate(GateKind::Or, Position::default());
        let a2 = g.add_gate(GateKind::And, Position::default());
        assert_eq!(a, GateId::new(GateKind::And, 0));
        assert_eq!(o, GateId::new(GateKind::Or, 0));
        assert_eq!(a2, GateId::new(GateKind::And, 1));
    }

    #[test]
    fn serials_are_not_reused_after_deletion() {
        let mut g = CircuitGraph::new();
        let a = g.add_gate(GateKind::And, Position::default());
        g.remove_gate(a).unwrap();
        let b = g.add_gate(GateKind::And, Position::default());
        assert_eq!(b.serial, 1);
    }

    #[test]
    fn connector_arity_matches_kind() {
        let (g, a, _, and) = and_with_sources();
        assert_eq!(g.gate(a).unwrap().inputs.len(), 0);
        assert_eq!(g.gate(a).unwrap().outputs.len(), 1);
        assert_eq!(g.gate(and).unwrap().inputs.len(), 2);
        assert_eq!(g.gate(and).unwrap().outputs.len(), 1);

        let mut g = CircuitGraph::new();
        let split = g.add_gate(GateKind::Splitter, Position::default());
        assert_eq!(g.gate(split).unwrap().outputs.len(), 2);
    }

    #[test]
    fn connect_output_to_input_succeeds() {
        let (mut g, a, _, and) = and_with_sources();
        let conn = g.try_connect(out0(&g, a), in_slot(&g, and, 0)).unwrap();
        assert_eq!(g.connection_count(), 1);
        assert_eq!(g.incoming(in_slot(&g, and, 0)), Some(conn));
        assert_eq!(g.fanout(out0(&g, a)), &[conn]);
    }

    #[test]
    fn connect_normalizes_pick_order() {
        let (mut g, a, _, and) = and_with_sources();
        // Input picked first; source/target are swapped internally.
        let conn = g.try_connect(in_slot(&g, and, 0), out0(&g, a)).unwrap();
        let record = g.connection(conn).unwrap();
        assert_eq!(record.source, out0(&g, a));
        assert_eq!(record.target, in_slot(&g, and, 0));
    }

    #[test]
    fn connect_same_direction_rejected() {
        let (mut g, a, b, and) = and_with_sources();
        assert_eq!(
            g.try_connect(out0(&g, a), out0(&g, b)),
            Err(ConnectError::SameDirection)
        );
        assert_eq!(
            g.try_connect(in_slot(&g, and, 0), in_slot(&g, and, 1)),
            Err(ConnectError::SameDirection)
        );
        assert_eq!(g.connection_count(), 0);
    }

    #[test]
    fn connect_same_gate_rejected() {
        let mut g = CircuitGraph::new();
        let not = g.add_gate(GateKind::Not, Position::default());
        let err = g
            .try_connect(out0(&g, not), in_slot(&g, not, 0))
            .unwrap_err();
        assert_eq!(err, ConnectError::SelfConnection { gate: not });
    }

    #[test]
    fn connect_occupied_target_rejected_without_replacement() {
        let (mut g, a, b, and) = and_with_sources();
        let first = g.try_connect(out0(&g, a), in_slot(&g, and, 0)).unwrap();
        let err = g
            .try_connect(out0(&g, b), in_slot(&g, and, 0))
            .unwrap_err();
        assert_eq!(
            err,
            ConnectError::TargetOccupied {
                target: in_slot(&g, and, 0),
                existing: first,
            }
        );
        // The original edge is untouched.
        assert_eq!(g.incoming(in_slot(&g, and, 0)), Some(first));
        assert_eq!(g.connection_count(), 1);
    }

    #[test]
    fn connect_unknown_connector_rejected() {
        let (mut g, a, _, _) = and_with_sources();
        let ghost = ConnectorId(9999);
        assert_eq!(
            g.try_connect(out0(&g, a), ghost),
            Err(ConnectError::UnknownConnector { id: ghost })
        );
    }

    #[test]
    fn disconnect_clears_target_value() {
        let (mut g, a, _, and) = and_with_sources();
        let target = in_slot(&g, and, 0);
        let conn = g.try_connect(out0(&g, a), target).unwrap();
        g.set_value(target, Signal::High);

        g.disconnect(conn).unwrap();
        assert_eq!(g.value(target), Some(Signal::Unset));
        assert_eq!(g.incoming(target), None);
        assert_eq!(g.fanout(out0(&g, a)), &[] as &[ConnectionId]);
    }

    #[test]
    fn remove_gate_cascades_connections() {
        let (mut g, a, b, and) = and_with_sources();
        g.try_connect(out0(&g, a), in_slot(&g, and, 0)).unwrap();
        g.try_connect(out0(&g, b), in_slot(&g, and, 1)).unwrap();
        let out_gate = g.add_gate(GateKind::Output, Position::default());
        g.try_connect(out0(&g, and), in_slot(&g, out_gate, 0))
            .unwrap();
        assert_eq!(g.connection_count(), 3);

        let removed = g.remove_gate(and).unwrap();
        assert_eq!(removed.connections.len(), 3);
        assert_eq!(removed.downstream, vec![out_gate]);
        assert_eq!(g.connection_count(), 0);
        assert!(g.gate(and).is_none());

        // No connection references the deleted gate's connectors.
        for conn in g.connections() {
            assert!(g.connector(conn.source).is_some());
            assert!(g.connector(conn.target).is_some());
        }
        // Connectors are gone with the gate.
        for c in removed
            .gate
            .inputs
            .iter()
            .chain(removed.gate.outputs.iter())
        {
            assert!(g.connector(*c).is_none());
        }
    }

    #[test]
    fn downstream_lists_each_gate_once() {
        // Splitter feeds the AND on both inputs, with an unrelated NOT
        // wired in between so the duplicate entries are not adjacent.
        let mut g = CircuitGraph::new();
        let split = g.add_gate(GateKind::Splitter, Position::default());
        let and = g.add_gate(GateKind::And, Position::default());
        let not = g.add_gate(GateKind::Not, Position::default());
        let outs = g.gate(split).unwrap().outputs.clone();
        g.try_connect(outs[0], in_slot(&g, and, 0)).unwrap();
        g.try_connect(outs[0], in_slot(&g, not, 0)).unwrap();
        g.try_connect(outs[1], in_slot(&g, and, 1)).unwrap();

        let removed = g.remove_gate(split).unwrap();
        assert_eq!(removed.connections.len(), 3);
        assert_eq!(removed.downstream, vec![and, not]);
    }

    #[test]
    fn reset_values_preserves_input_levels() {
        let (mut g, a, _, _) = and_with_sources();
        g.set_level(a, Signal::High);
        g.set_value(out0(&g, a), Signal::High);

        g.reset_values();
        assert_eq!(g.value(out0(&g, a)), Some(Signal::Unset));
        assert_eq!(g.gate(a).unwrap().level, Signal::High);
    }

    #[test]
    fn input_gates_lists_only_sources() {
        let (mut g, a, b, _) = and_with_sources();
        g.add_gate(GateKind::Output, Position::default());
        let mut inputs = g.input_gates();
        inputs.sort();
        assert_eq!(inputs, vec![a, b]);
    }

    // Builds a pool of gates, then checks the try_connect contract for
    // arbitrary connector pairs: success iff directions differ, gates
    // differ, and the target input is free.
    proptest! {
        #[test]
        fn connect_contract_holds_for_arbitrary_pairs(
            picks in proptest::collection::vec((0usize..12, 0usize..12), 1..24),
        ) {
            let mut g = CircuitGraph::new();
            for _ in 0..2 {
                g.add_gate(GateKind::Input, Position::default());
                g.add_gate(GateKind::Not, Position::default());
                g.add_gate(GateKind::And, Position::default());
                g.add_gate(GateKind::Output, Position::default());
            }
            let pool: Vec<ConnectorId> = g
                .gates()
                .flat_map(|gate| gate.inputs.iter().chain(gate.outputs.iter()))
                .copied()
                .collect();

            for (i, j) in picks {
                let a = pool[i % pool.len()];
                let b = pool[j % pool.len()];
                let ca = g.connector(a).unwrap().clone();
                let cb = g.connector(b).unwrap().clone();
                let expect_ok = ca.direction != cb.direction
                    && ca.gate != cb.gate
                    && {
                        let target = if ca.direction == Direction::Input { a } else { b };
                        g.incoming(target).is_none()
                    };
                let before = g.connection_count();
                match g.try_connect(a, b) {
                    Ok(_) => {
                        prop_assert!(expect_ok);
                        prop_assert_eq!(g.connection_count(), before + 1);
                    }
                    Err(_) => {
                        prop_assert!(!expect_ok);
                        prop_assert_eq!(g.connection_count(), before);
                    }
                }
            }
        }
    }
}
