//! Per-run counters for the propagation engine.
//!
//! [`WaveMetrics`] is the engine's observability surface: the host can
//! poll it to show activity, and the integrity-drop counter records
//! deliveries that fired against connections deleted mid-flight.

use wyre_core::SimTime;

/// Counters accumulated over one simulation run.
///
/// Cleared by `reset_circuit()` — each run starts from zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaveMetrics {
    /// Propagation waves executed (one per distinct fire time).
    pub waves: u64,
    /// Deliveries applied to a live target connector.
    pub deliveries_applied: u64,
    /// Deliveries dropped because their connection no longer resolved.
    ///
    /// Nonzero values mean a structural edit raced an in-flight wave;
    /// the engine drops the delivery and keeps going.
    pub deliveries_dropped: u64,
    /// Gate evaluations performed.
    pub gates_evaluated: u64,
    /// Virtual time of the most recent wave.
    pub last_wave_at: SimTime,
}
