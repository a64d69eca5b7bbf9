//! Circuit fixtures for Wyre development.
//!
//! Small, well-known circuits used across the workspace's test suites
//! and benchmarks, plus connector lookup helpers so tests read as
//! wiring diagrams rather than index arithmetic.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use wyre_core::{ConnectorId, GateId};
use wyre_graph::CircuitGraph;

/// The `slot`th input connector of a gate.
///
/// Panics on a missing gate or slot; fixtures construct both, so a
/// failure here is a broken test, not a broken circuit.
pub fn input_of(graph: &CircuitGraph, gate: GateId, slot: usize) -> ConnectorId {
    graph.gate(gate).expect("fixture gate exists").inputs[slot]
}

/// The `slot`th output connector of a gate.
pub fn output_of(graph: &CircuitGraph, gate: GateId, slot: usize) -> ConnectorId {
    graph.gate(gate).expect("fixture gate exists").outputs[slot]
}
