//! Core types for the Wyre logic-circuit engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the Wyre workspace:
//! tri-state signal values, gate kinds and their evaluation table,
//! strongly-typed IDs, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod kind;
pub mod signal;

pub use error::{ConfigError, ConnectError, ControlError, LimitError};
pub use id::{ConnectionId, ConnectorId, GateId, Position, SimTime};
pub use kind::{GateKind, Outputs};
pub use signal::Signal;
