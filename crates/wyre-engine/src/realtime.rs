//! Wall-clock driver: runs a [`Simulation`] on a background thread.
//!
//! The lockstep [`Simulation`] advances its virtual clock only when the
//! caller steps it. [`RealtimeSim`] moves the simulation onto a
//! dedicated thread and maps one virtual millisecond to one wall
//! millisecond: the thread sleeps until the next scheduled delivery is
//! due, steps, and goes back to waiting.
//!
//! # Architecture
//!
//! ```text
//! Caller Thread                 Sim Thread
//!     |                             |
//!     |--request + reply_tx-------->| recv / recv_timeout(next fire)
//!     |   [ctl_tx: bounded(64)]     | apply to Simulation
//!     |<--reply via reply_tx--------| on timeout: sim.step()
//! ```
//!
//! The simulation is owned exclusively by its thread (moved in via
//! `thread::spawn`); requests arrive on a bounded crossbeam channel and
//! each carries its own reply channel. No locks anywhere.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use wyre_core::{
    ConfigError, ConnectError, ConnectionId, ConnectorId, ControlError, GateId, GateKind,
    LimitError, Position, SimTime,
};
use wyre_graph::{Connection, Gate};

use crate::controller::Simulation;
use crate::metrics::WaveMetrics;
use crate::propagate::RunPhase;

// ── Error type ──────────────────────────────────────────────────

/// Error talking to the simulation thread.
#[derive(Debug, PartialEq, Eq)]
pub enum RealtimeError {
    /// The simulation thread has shut down.
    Disconnected,
}

impl std::fmt::Display for RealtimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "simulation thread has shut down"),
        }
    }
}

impl std::error::Error for RealtimeError {}

// ── Snapshot ────────────────────────────────────────────────────

/// A point-in-time copy of the circuit for host rendering.
#[derive(Clone, Debug)]
pub struct CircuitSnapshot {
    /// All live gates, in placement order.
    pub gates: Vec<Gate>,
    /// All live connections, in creation order.
    pub connections: Vec<Connection>,
    /// Where the run stands.
    pub phase: RunPhase,
    /// Counters for the current run.
    pub metrics: WaveMetrics,
    /// Whether a run is active.
    pub running: bool,
    /// Current virtual time.
    pub now: SimTime,
}

// ── Requests ────────────────────────────────────────────────────

enum Request {
    AddGate(GateKind, Position, Sender<Result<GateId, LimitError>>),
    RemoveGate(GateId, Sender<bool>),
    Connect(
        ConnectorId,
        ConnectorId,
        Sender<Result<ConnectionId, ConnectError>>,
    ),
    Disconnect(ConnectionId, Sender<bool>),
    SetInput(GateId, bool, Sender<Result<(), ControlError>>),
    Start(Sender<Result<(), ControlError>>),
    Stop(Sender<()>),
    Reset(Sender<()>),
    SetDelay(u64, Sender<Result<(), ConfigError>>),
    Snapshot(Sender<CircuitSnapshot>),
    Shutdown,
}

// ── RealtimeSim ─────────────────────────────────────────────────

/// A [`Simulation`] advanced on wall time by a background thread.
pub struct RealtimeSim {
    ctl_tx: Option<Sender<Request>>,
    handle: Option<JoinHandle<Simulation>>,
}

impl RealtimeSim {
    /// Move `sim` onto its own thread and start serving requests.
    pub fn spawn(sim: Simulation) -> Self {
        // Bounded so a runaway caller backpressures instead of piling
        // up unbounded requests behind a busy oscillator.
        let (ctl_tx, ctl_rx) = bounded(64);
        let handle = thread::spawn(move || run_loop(sim, ctl_rx));
        Self {
            ctl_tx: Some(ctl_tx),
            handle: Some(handle),
        }
    }

    /// Place a gate (see [`Simulation::add_gate`]).
    pub fn add_gate(
        &self,
        kind: GateKind,
        position: Position,
    ) -> Result<Result<GateId, LimitError>, RealtimeError> {
        self.request(|reply| Request::AddGate(kind, position, reply))
    }

    /// Delete a gate and everything attached to it.
    pub fn remove_gate(&self, id: GateId) -> Result<bool, RealtimeError> {
        self.request(|reply| Request::RemoveGate(id, reply))
    }

    /// Validate and create a connection.
    pub fn connect(
        &self,
        a: ConnectorId,
        b: ConnectorId,
    ) -> Result<Result<ConnectionId, ConnectError>, RealtimeError> {
        self.request(|reply| Request::Connect(a, b, reply))
    }

    /// Delete a connection.
    pub fn disconnect(&self, id: ConnectionId) -> Result<bool, RealtimeError> {
        self.request(|reply| Request::Disconnect(id, reply))
    }

    /// Toggle an `Input` gate's external level.
    pub fn set_gate_input(
        &self,
        gate: GateId,
        on: bool,
    ) -> Result<Result<(), ControlError>, RealtimeError> {
        self.request(|reply| Request::SetInput(gate, on, reply))
    }

    /// Begin a run; the thread starts firing waves on wall time.
    pub fn start(&self) -> Result<Result<(), ControlError>, RealtimeError> {
        self.request(Request::Start)
    }

    /// End the run and reset.
    pub fn stop(&self) -> Result<(), RealtimeError> {
        self.request(Request::Stop)
    }

    /// Clear all wire state (input toggles survive).
    pub fn reset_circuit(&self) -> Result<(), RealtimeError> {
        self.request(Request::Reset)
    }

    /// Reconfigure the per-hop delay.
    pub fn set_delay_ms(&self, delay_ms: u64) -> Result<Result<(), ConfigError>, RealtimeError> {
        self.request(|reply| Request::SetDelay(delay_ms, reply))
    }

    /// Copy the current circuit state for rendering.
    pub fn snapshot(&self) -> Result<CircuitSnapshot, RealtimeError> {
        self.request(Request::Snapshot)
    }

    /// Stop the thread and recover the simulation.
    pub fn shutdown(mut self) -> Result<Simulation, RealtimeError> {
        let tx = self.ctl_tx.take().ok_or(RealtimeError::Disconnected)?;
        let _ = tx.send(Request::Shutdown);
        drop(tx);
        self.handle
            .take()
            .ok_or(RealtimeError::Disconnected)?
            .join()
            .map_err(|_| RealtimeError::Disconnected)
    }

    fn request<T>(
        &self,
        make: impl FnOnce(Sender<T>) -> Request,
    ) -> Result<T, RealtimeError> {
        let (reply_tx, reply_rx) = bounded(1);
        let ctl = self.ctl_tx.as_ref().ok_or(RealtimeError::Disconnected)?;
        ctl.send(make(reply_tx))
            .map_err(|_| RealtimeError::Disconnected)?;
        reply_rx.recv().map_err(|_| RealtimeError::Disconnected)
    }
}

impl Drop for RealtimeSim {
    fn drop(&mut self) {
        // Best-effort: the thread also exits when the channel closes.
        if let Some(tx) = self.ctl_tx.take() {
            let _ = tx.send(Request::Shutdown);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ── Thread loop ─────────────────────────────────────────────────

fn run_loop(mut sim: Simulation, ctl_rx: Receiver<Request>) -> Simulation {
    // Wall-clock deadline armed for the earliest pending fire time.
    // The virtual-to-wall mapping is captured once per fire time, so
    // serving requests in between waits only for the remainder — a
    // client polling faster than the delay must not postpone the wave.
    let mut armed: Option<(SimTime, Instant)> = None;
    loop {
        let next = if sim.is_running() {
            sim.next_fire_at()
        } else {
            None
        };
        let request = match next {
            // A delivery is pending; serve requests until its wall
            // deadline passes, then fire the wave.
            Some(fire_at) => {
                let deadline = match armed {
                    Some((t, d)) if t == fire_at => d,
                    _ => {
                        let ms = sim.next_fire_in_ms().unwrap_or(0);
                        let d = Instant::now() + Duration::from_millis(ms);
                        armed = Some((fire_at, d));
                        d
                    }
                };
                let wait = deadline.saturating_duration_since(Instant::now());
                match ctl_rx.recv_timeout(wait) {
                    Ok(request) => request,
                    Err(RecvTimeoutError::Timeout) => {
                        sim.step();
                        armed = None;
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            // Settled or stopped: nothing to fire, block until asked.
            None => {
                armed = None;
                match ctl_rx.recv() {
                    Ok(request) => request,
                    Err(_) => break,
                }
            }
        };

        // Replies are best-effort: the caller may have given up.
        match request {
            Request::AddGate(kind, position, reply) => {
                let _ = reply.send(sim.add_gate(kind, position));
            }
            Request::RemoveGate(id, reply) => {
                let _ = reply.send(sim.remove_gate(id));
            }
            Request::Connect(a, b, reply) => {
                let _ = reply.send(sim.try_connect(a, b));
            }
            Request::Disconnect(id, reply) => {
                let _ = reply.send(sim.disconnect(id));
            }
            Request::SetInput(gate, on, reply) => {
                let _ = reply.send(sim.set_gate_input(gate, on));
            }
            Request::Start(reply) => {
                let _ = reply.send(sim.start());
            }
            Request::Stop(reply) => {
                sim.stop();
                let _ = reply.send(());
            }
            Request::Reset(reply) => {
                sim.reset_circuit();
                let _ = reply.send(());
            }
            Request::SetDelay(ms, reply) => {
                let _ = reply.send(sim.set_delay_ms(ms));
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(CircuitSnapshot {
                    gates: sim.gates().cloned().collect(),
                    connections: sim.connections().copied().collect(),
                    phase: sim.phase(),
                    metrics: sim.metrics().clone(),
                    running: sim.is_running(),
                    now: sim.now(),
                });
            }
            Request::Shutdown => break,
        }
    }
    sim
}
