//! Wyre: a timed logic-gate circuit simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Wyre sub-crates. For most users, adding `wyre` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use wyre::prelude::*;
//!
//! // Build an inverter: INPUT -> NOT, toggle it, run to quiescence.
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! let src = sim.add_gate(GateKind::Input, Position::new(0, 0)).unwrap();
//! let not = sim.add_gate(GateKind::Not, Position::new(100, 0)).unwrap();
//!
//! let src_out = sim.graph().gate(src).unwrap().outputs[0];
//! let not_in = sim.graph().gate(not).unwrap().inputs[0];
//! sim.try_connect(src_out, not_in).unwrap();
//!
//! sim.set_gate_input(src, true).unwrap();
//! sim.start().unwrap();
//! assert!(sim.run_until_settled(16));
//!
//! let not_out = sim.graph().gate(not).unwrap().outputs[0];
//! assert_eq!(sim.graph().value(not_out), Some(Signal::Low));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `wyre-core` | Signals, gate kinds, IDs, error taxonomy |
//! | [`graph`] | `wyre-graph` | Circuit graph, validation, persistence codec |
//! | [`engine`] | `wyre-engine` | Propagation engine, controller, realtime driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the error taxonomy (`wyre-core`).
///
/// Tri-state [`types::Signal`], the [`types::GateKind`] evaluation
/// table, strongly-typed IDs, and every error the workspace returns.
pub use wyre_core as types;

/// Circuit graph and persistence (`wyre-graph`).
///
/// The [`graph::CircuitGraph`] data model with its validation rules,
/// plus the binary codec in [`graph::codec`].
pub use wyre_graph as graph;

/// Simulation engines (`wyre-engine`).
///
/// [`engine::Simulation`] for host-stepped lockstep runs,
/// [`engine::RealtimeSim`] for wall-clock background ticking.
pub use wyre_engine as engine;

/// Common imports for typical Wyre usage.
///
/// ```rust
/// use wyre::prelude::*;
/// ```
///
/// This imports the most frequently used types: the simulation
/// controller and its configuration, the graph, gate kinds, signals,
/// IDs, and the error types surfaced by controller calls.
pub mod prelude {
    // Core vocabulary
    pub use wyre_core::{
        ConnectionId, ConnectorId, GateId, GateKind, Position, SimTime, Signal,
    };

    // Errors
    pub use wyre_core::{ConfigError, ConnectError, ControlError, LimitError};

    // Graph
    pub use wyre_graph::{CircuitGraph, Connection, Connector, Direction, Gate};

    // Engine
    pub use wyre_engine::{
        Allowances, RealtimeSim, RunPhase, SimConfig, Simulation, WaveMetrics,
    };
}
