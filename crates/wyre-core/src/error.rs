//! Error taxonomy for circuit editing and simulation control.
//!
//! Every user-facing operation in Wyre is total: invalid requests come
//! back as one of these values and mutate nothing. Nothing in the
//! engine is fatal — the worst failure mode is a stalled or oscillating
//! circuit, which is a valid physical outcome, not an error.

use std::error::Error;
use std::fmt;

use crate::id::{ConnectionId, ConnectorId, GateId};
use crate::kind::GateKind;

/// Reasons a connection request is refused.
///
/// Returned by `try_connect`; the graph is untouched on rejection. The
/// occupied-target case is a refusal, never a replacement — the host UI
/// cancels the pick rather than silently rewiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectError {
    /// Both connectors have the same direction (two inputs or two outputs).
    SameDirection,
    /// Source and target belong to the same gate.
    SelfConnection {
        /// The gate owning both connectors.
        gate: GateId,
    },
    /// The target input already has an incoming connection.
    TargetOccupied {
        /// The occupied input connector.
        target: ConnectorId,
        /// The connection currently driving it.
        existing: ConnectionId,
    },
    /// One of the connector IDs does not resolve in this graph.
    UnknownConnector {
        /// The unresolved ID.
        id: ConnectorId,
    },
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameDirection => write!(f, "connectors have the same direction"),
            Self::SelfConnection { gate } => {
                write!(f, "both connectors belong to gate {gate}")
            }
            Self::TargetOccupied { target, existing } => {
                write!(
                    f,
                    "input connector {target} is already driven by connection {existing}"
                )
            }
            Self::UnknownConnector { id } => write!(f, "unknown connector {id}"),
        }
    }
}

impl Error for ConnectError {}

/// Gate creation refused because the per-kind allowance is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitError {
    /// The kind whose allowance was hit.
    pub kind: GateKind,
    /// The configured ceiling (0 = kind forbidden entirely).
    pub limit: i32,
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gate limit of {} reached", self.kind, self.limit)
    }
}

impl Error for LimitError {}

/// Reasons a simulation control request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// `start()` was called while the simulation capability is disabled.
    SimulationDisabled,
    /// `set_gate_input` targeted a gate that is not an `Input` gate.
    NotAnInputGate {
        /// The offending gate.
        gate: GateId,
    },
    /// The gate ID does not resolve in this circuit.
    UnknownGate {
        /// The unresolved ID.
        gate: GateId,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimulationDisabled => write!(f, "simulation is disabled"),
            Self::NotAnInputGate { gate } => {
                write!(f, "gate {gate} is not an INPUT gate")
            }
            Self::UnknownGate { gate } => write!(f, "unknown gate {gate}"),
        }
    }
}

impl Error for ControlError {}

/// Errors detected while validating a [`SimConfig`].
///
/// [`SimConfig`]: https://docs.rs/wyre-engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An allowance is neither -1, 0, nor a positive ceiling.
    InvalidAllowance {
        /// The kind carrying the bad allowance.
        kind: GateKind,
        /// The rejected value.
        value: i32,
    },
    /// The propagation delay would overflow the virtual clock.
    DelayOutOfRange {
        /// The rejected delay in milliseconds.
        ms: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAllowance { kind, value } => {
                write!(
                    f,
                    "allowance for {kind} must be -1, 0, or positive, got {value}"
                )
            }
            Self::DelayOutOfRange { ms } => {
                write!(f, "propagation delay {ms}ms is out of range")
            }
        }
    }
}

impl Error for ConfigError {}
