//! The propagation engine: seeding, waves, and quiescence.
//!
//! Signal moves through the circuit as a wavefront, one gate-hop per
//! delay interval: a delivery fires, the driven gate re-evaluates, and
//! any changed output schedules fresh deliveries a full delay later.
//! The engine runs on a virtual millisecond clock that jumps from one
//! scheduled fire time to the next — wall time only enters through the
//! realtime driver.
//!
//! Feedback loops are deliberately not detected. A ring whose
//! evaluation keeps flipping values keeps re-scheduling forever; that
//! is oscillation, the same emergent behavior a physical latch built
//! from cross-coupled gates exhibits, and not an error. Callers that
//! need a bound use [`run_until_settled`](PropagationEngine::run_until_settled).

use indexmap::IndexSet;
use smallvec::SmallVec;

use wyre_core::{ConnectionId, ConnectorId, GateId, GateKind, SimTime, Signal};
use wyre_graph::CircuitGraph;

use crate::metrics::WaveMetrics;
use crate::queue::DeliveryQueue;

// ── RunPhase ────────────────────────────────────────────────────

/// Where a simulation run currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunPhase {
    /// No run in progress; all wires `Unset`.
    #[default]
    Idle,
    /// Input gates are being seeded.
    Seeding,
    /// Deliveries are pending; the wavefront is moving.
    Propagating,
    /// No pending deliveries and nothing changed in the last wave.
    Settled,
}

// ── PropagationEngine ───────────────────────────────────────────

/// Drives signal through a [`CircuitGraph`] on a virtual clock.
///
/// The engine owns the delivery queue and the clock but not the graph;
/// the simulation controller passes the graph into every call, which
/// keeps structural edits and propagation on one logical thread with
/// no locking.
#[derive(Debug)]
pub struct PropagationEngine {
    queue: DeliveryQueue,
    now: SimTime,
    delay_ms: u64,
    phase: RunPhase,
    metrics: WaveMetrics,
}

impl PropagationEngine {
    /// Create an idle engine with the given per-hop delay.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            queue: DeliveryQueue::new(),
            now: SimTime::ZERO,
            delay_ms,
            phase: RunPhase::Idle,
            metrics: WaveMetrics::default(),
        }
    }

    /// The current virtual time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// The current run phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The per-hop delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Change the per-hop delay.
    ///
    /// Affects only future schedules — every in-flight delivery keeps
    /// its originally scheduled fire time.
    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    /// Counters for the current run.
    pub fn metrics(&self) -> &WaveMetrics {
        &self.metrics
    }

    /// Fire time of the earliest pending delivery.
    pub fn next_fire_at(&self) -> Option<SimTime> {
        self.queue.next_fire_at()
    }

    /// Number of pending deliveries.
    pub fn pending_deliveries(&self) -> usize {
        self.queue.len()
    }

    // ── Seeding ─────────────────────────────────────────────────

    /// Seed every `Input` gate and schedule the first wave.
    pub fn seed_all(&mut self, graph: &mut CircuitGraph) {
        self.phase = RunPhase::Seeding;
        for id in graph.input_gates() {
            self.seed_gate(graph, id);
        }
        self.phase = if self.queue.is_empty() {
            RunPhase::Settled
        } else {
            RunPhase::Propagating
        };
    }

    /// Seed a single `Input` gate: drive its output from the external
    /// toggle and schedule deliveries across its fan-out.
    ///
    /// An untouched toggle (`Unset`) drives low — a source gate always
    /// drives *something*. Non-`Input` gates are ignored.
    pub fn seed_gate(&mut self, graph: &mut CircuitGraph, id: GateId) {
        if id.kind != GateKind::Input {
            return;
        }
        let Some(gate) = graph.gate(id) else {
            return;
        };
        let Some(output) = gate.outputs.first().copied() else {
            return;
        };
        let drive = Signal::from_bool(gate.level.as_bool());
        graph.set_value(output, drive);
        let fire_at = self.now.after(self.delay_ms);
        for conn in graph.fanout(output) {
            self.queue.schedule(fire_at, *conn, drive);
        }
        self.note_pending();
    }

    // ── Waves ───────────────────────────────────────────────────

    /// Advance the clock to the next fire time and run one wave.
    ///
    /// Applies every due delivery (a delivery whose connection was
    /// deleted mid-flight is dropped and counted), re-evaluates the
    /// gates whose inputs changed, and schedules follow-on deliveries
    /// for any output that changed. Returns `false` — and transitions
    /// to `Settled` — when nothing is pending.
    pub fn step(&mut self, graph: &mut CircuitGraph) -> bool {
        let Some(fire_at) = self.queue.next_fire_at() else {
            if matches!(self.phase, RunPhase::Seeding | RunPhase::Propagating) {
                self.phase = RunPhase::Settled;
            }
            return false;
        };
        self.now = fire_at;

        let mut dirty: IndexSet<GateId> = IndexSet::new();
        while let Some(delivery) = self.queue.pop_due(self.now) {
            match graph.connection(delivery.connection).copied() {
                Some(conn) => {
                    graph.set_value(conn.target, delivery.value);
                    self.metrics.deliveries_applied += 1;
                    if let Some(owner) = graph.owner_of(conn.target) {
                        dirty.insert(owner);
                    }
                }
                None => self.metrics.deliveries_dropped += 1,
            }
        }

        for gate in dirty {
            self.evaluate(graph, gate);
        }

        self.metrics.waves += 1;
        self.metrics.last_wave_at = self.now;
        self.phase = if self.queue.is_empty() {
            RunPhase::Settled
        } else {
            RunPhase::Propagating
        };
        true
    }

    /// Step until quiescent or until `max_waves` waves have run.
    ///
    /// Returns whether the circuit settled. An oscillating feedback
    /// loop never settles; the bound is what makes this call total.
    pub fn run_until_settled(&mut self, graph: &mut CircuitGraph, max_waves: u64) -> bool {
        for _ in 0..max_waves {
            if !self.step(graph) {
                return true;
            }
        }
        self.queue.is_empty()
    }

    /// Re-evaluate a gate and schedule deliveries for changed outputs.
    ///
    /// Also the structural-edit hook: when a driver disappears, the
    /// controller calls this on the orphaned downstream gates so they
    /// recompute with the absent input reading `Unset`.
    pub fn evaluate(&mut self, graph: &mut CircuitGraph, id: GateId) {
        let Some(gate) = graph.gate(id) else {
            return;
        };
        // Source gates are driven by their toggle, never derived.
        if id.kind == GateKind::Input {
            return;
        }
        let outputs: SmallVec<[ConnectorId; 2]> = gate.outputs.clone();
        let inputs = graph.input_values(id);
        let values = id.kind.eval(&inputs);
        self.metrics.gates_evaluated += 1;

        let fire_at = self.now.after(self.delay_ms);
        for (slot, value) in values.into_iter().enumerate() {
            let Some(connector) = outputs.get(slot).copied() else {
                continue;
            };
            let previous = graph.set_value(connector, value);
            if previous != Some(value) {
                for conn in graph.fanout(connector) {
                    self.queue.schedule(fire_at, *conn, value);
                }
            }
        }
        self.note_pending();
    }

    // ── Structural-edit hooks ───────────────────────────────────

    /// Schedule delivery of the source's current value across a newly
    /// created connection. No-op if the source is undriven.
    pub fn schedule_connection(&mut self, graph: &CircuitGraph, id: ConnectionId) {
        let Some(conn) = graph.connection(id) else {
            return;
        };
        match graph.value(conn.source) {
            Some(value) if value.is_set() => {
                self.queue.schedule(self.now.after(self.delay_ms), id, value);
                self.note_pending();
            }
            _ => {}
        }
    }

    /// Synchronously drop pending deliveries for severed connections.
    pub fn purge_connections(&mut self, severed: &[ConnectionId]) {
        self.queue.purge(|c| severed.contains(&c));
        if self.queue.is_empty() && self.phase == RunPhase::Propagating {
            self.phase = RunPhase::Settled;
        }
    }

    // ── Reset ───────────────────────────────────────────────────

    /// Cancel everything and return to `Idle`.
    ///
    /// Every connector goes back to `Unset` (input-gate toggles
    /// survive), pending deliveries are cancelled, the clock rewinds to
    /// zero, and the run counters clear. Idempotent; legal in any phase.
    pub fn reset(&mut self, graph: &mut CircuitGraph) {
        self.queue.clear();
        self.now = SimTime::ZERO;
        self.phase = RunPhase::Idle;
        self.metrics = WaveMetrics::default();
        graph.reset_values();
    }

    fn note_pending(&mut self) {
        if !self.queue.is_empty() && self.phase != RunPhase::Seeding {
            self.phase = RunPhase::Propagating;
        }
    }
}
