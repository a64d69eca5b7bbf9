//! Circuit graph for the Wyre logic-circuit engine.
//!
//! Owns the live set of gates, connectors, and connections, the
//! validation rules that keep the graph well-formed, and the topology
//! queries the propagation engine depends on. Also home to the
//! persistence codec that round-trips a circuit through a compact
//! binary format.
//!
//! Structural edits here are pure graph mutations — signal propagation
//! is always deferred to the engine crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
mod connection;
mod connector;
mod gate;
mod graph;

pub use codec::{decode_circuit, encode_circuit, CodecError, DecodedCircuit};
pub use connection::Connection;
pub use connector::{Connector, Direction};
pub use gate::Gate;
pub use graph::{CircuitGraph, RemovedGate};
