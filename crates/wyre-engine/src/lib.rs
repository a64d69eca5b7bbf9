//! Simulation engine for the Wyre logic-circuit workspace.
//!
//! Sits on top of `wyre-graph` and adds time: a discrete-event delivery
//! queue, a propagation engine that moves signal one gate-hop per delay
//! interval on a virtual millisecond clock, and the [`Simulation`]
//! controller that keeps structural edits and runs consistent.
//! [`RealtimeSim`] wraps the controller in a background thread that
//! maps virtual milliseconds to wall milliseconds.
//!
//! The split mirrors the data model: the graph never propagates, the
//! engine never mutates topology, and the controller is the only place
//! the two meet.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod controller;
mod metrics;
mod propagate;
mod queue;
mod realtime;

pub use config::{Allowances, SimConfig, MAX_DELAY_MS};
pub use controller::Simulation;
pub use metrics::WaveMetrics;
pub use propagate::{PropagationEngine, RunPhase};
pub use queue::{Delivery, DeliveryQueue};
pub use realtime::{CircuitSnapshot, RealtimeError, RealtimeSim};
