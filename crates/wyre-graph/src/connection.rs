//! Connections: directed edges from an output connector to an input.

use wyre_core::{ConnectionId, ConnectorId};

/// A directed edge carrying signal from an output to an input connector.
///
/// Validated at creation: the endpoints have opposite directions, belong
/// to different gates, and the target has no other incoming connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    /// Unique ID within the graph.
    pub id: ConnectionId,
    /// The driving output connector.
    pub source: ConnectorId,
    /// The driven input connector.
    pub target: ConnectorId,
}
