//! The simulation controller: the host-facing surface.
//!
//! [`Simulation`] owns the circuit graph, the propagation engine, and
//! the configuration, and keeps them consistent across the two things
//! that happen to a circuit: structural edits and simulation runs.
//!
//! Two independent switches govern running: `simulation_enabled` is the
//! author-time capability (can this circuit be simulated at all?), and
//! `running` is the user's simulate control. Disabling the capability
//! forces a stop and a reset; enabling it restores a safe default of
//! "stopped, awaiting an explicit start".
//!
//! Every method is total from the caller's perspective — invalid
//! requests come back as error values and mutate nothing.

use wyre_core::{
    ConfigError, ConnectError, ConnectionId, ControlError, GateId, GateKind, LimitError, Position,
    SimTime, Signal,
};
use wyre_graph::{CircuitGraph, Connection, Gate};

use crate::config::{SimConfig, MAX_DELAY_MS};
use crate::metrics::WaveMetrics;
use crate::propagate::{PropagationEngine, RunPhase};

/// Top-level circuit simulation: graph + engine + configuration.
pub struct Simulation {
    graph: CircuitGraph,
    engine: PropagationEngine,
    config: SimConfig,
    running: bool,
}

impl Simulation {
    /// Build a simulation over an empty circuit.
    ///
    /// Validates the configuration up front; nothing later re-checks it.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::from_graph(CircuitGraph::new(), config)
    }

    /// Build a simulation over an existing circuit (persistence load).
    pub fn from_graph(graph: CircuitGraph, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = PropagationEngine::new(config.delay_ms);
        Ok(Self {
            graph,
            engine,
            config,
            running: false,
        })
    }

    // ── Structural edits ────────────────────────────────────────

    /// Place a gate, enforcing the per-kind allowance.
    ///
    /// Refusal is a no-op: the graph keeps its current count.
    pub fn add_gate(&mut self, kind: GateKind, position: Position) -> Result<GateId, LimitError> {
        let limit = self.config.allowances.limit(kind);
        if limit >= 0 && self.graph.count_of_kind(kind) >= limit as usize {
            return Err(LimitError { kind, limit });
        }
        Ok(self.graph.add_gate(kind, position))
    }

    /// Delete a gate, cascading over its connections.
    ///
    /// Pending deliveries for the severed connections are purged
    /// synchronously, and — when a run is active — downstream gates
    /// re-evaluate immediately with the absent driver reading `Unset`.
    /// Returns whether the gate existed.
    pub fn remove_gate(&mut self, id: GateId) -> bool {
        let Some(removed) = self.graph.remove_gate(id) else {
            return false;
        };
        let severed: Vec<ConnectionId> = removed.connections.iter().map(|c| c.id).collect();
        self.engine.purge_connections(&severed);
        if self.running {
            for gate in removed.downstream {
                self.engine.evaluate(&mut self.graph, gate);
            }
        }
        true
    }

    /// Validate and create a connection (see [`CircuitGraph::try_connect`]).
    ///
    /// During a run, the new edge receives the source's current value
    /// after one delay interval — deferred to the engine, never inline.
    pub fn try_connect(
        &mut self,
        a: wyre_core::ConnectorId,
        b: wyre_core::ConnectorId,
    ) -> Result<ConnectionId, ConnectError> {
        let id = self.graph.try_connect(a, b)?;
        if self.running {
            self.engine.schedule_connection(&self.graph, id);
        }
        Ok(id)
    }

    /// Delete a connection, purging its pending deliveries.
    ///
    /// Returns whether the connection existed. During a run the
    /// orphaned target gate re-evaluates with its freed input `Unset`.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let Some(conn) = self.graph.disconnect(id) else {
            return false;
        };
        self.engine.purge_connections(&[id]);
        if self.running {
            if let Some(owner) = self.graph.owner_of(conn.target) {
                self.engine.evaluate(&mut self.graph, owner);
            }
        }
        true
    }

    // ── Run control ─────────────────────────────────────────────

    /// Flip the author-time simulation capability.
    ///
    /// Disabling forces `running = false` and resets the circuit;
    /// enabling leaves the simulation stopped, awaiting `start()`.
    pub fn toggle_allow_simulation(&mut self) {
        self.config.simulation_enabled = !self.config.simulation_enabled;
        if !self.config.simulation_enabled {
            self.running = false;
            self.engine.reset(&mut self.graph);
        }
    }

    /// Begin a run: reset, then seed every `Input` gate.
    pub fn start(&mut self) -> Result<(), ControlError> {
        if !self.config.simulation_enabled {
            return Err(ControlError::SimulationDisabled);
        }
        self.engine.reset(&mut self.graph);
        self.running = true;
        self.engine.seed_all(&mut self.graph);
        Ok(())
    }

    /// End the run: cancel pending deliveries and reset.
    pub fn stop(&mut self) {
        self.running = false;
        self.engine.reset(&mut self.graph);
    }

    /// Clear all wire state and return to `Idle`.
    ///
    /// Idempotent and legal in any state, including before any run.
    /// Input-gate toggles survive.
    pub fn reset_circuit(&mut self) {
        self.running = false;
        self.engine.reset(&mut self.graph);
    }

    /// Toggle an `Input` gate's external level.
    ///
    /// During a run this seeds that single gate, so the change ripples
    /// out after one delay interval.
    pub fn set_gate_input(&mut self, gate: GateId, on: bool) -> Result<(), ControlError> {
        match self.graph.gate(gate) {
            None => return Err(ControlError::UnknownGate { gate }),
            Some(g) if g.kind() != GateKind::Input => {
                return Err(ControlError::NotAnInputGate { gate })
            }
            Some(_) => {}
        }
        self.graph.set_level(gate, Signal::from_bool(on));
        if self.running {
            self.engine.seed_gate(&mut self.graph, gate);
        }
        Ok(())
    }

    /// Reconfigure the per-hop delay; in-flight deliveries keep their
    /// original fire time.
    pub fn set_delay_ms(&mut self, delay_ms: u64) -> Result<(), ConfigError> {
        if delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::DelayOutOfRange { ms: delay_ms });
        }
        self.config.delay_ms = delay_ms;
        self.engine.set_delay_ms(delay_ms);
        Ok(())
    }

    // ── Lockstep drivers ────────────────────────────────────────

    /// Advance one wave on the virtual clock (no-op when stopped).
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.engine.step(&mut self.graph)
    }

    /// Step until quiescent or `max_waves` waves have run; returns
    /// whether the circuit settled. Oscillators never settle.
    pub fn run_until_settled(&mut self, max_waves: u64) -> bool {
        if !self.running {
            return true;
        }
        self.engine.run_until_settled(&mut self.graph, max_waves)
    }

    // ── Read-only surface ───────────────────────────────────────

    /// All live gates, in placement order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.graph.gates()
    }

    /// All live connections, in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.connections()
    }

    /// The underlying graph (persistence encode, host rendering).
    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    /// Where the current run stands.
    pub fn phase(&self) -> RunPhase {
        self.engine.phase()
    }

    /// Counters for the current run.
    pub fn metrics(&self) -> &WaveMetrics {
        self.engine.metrics()
    }

    /// Current virtual time.
    pub fn now(&self) -> SimTime {
        self.engine.now()
    }

    /// Virtual fire time of the earliest pending delivery.
    pub fn next_fire_at(&self) -> Option<SimTime> {
        self.engine.next_fire_at()
    }

    /// Milliseconds of virtual time until the next pending delivery.
    pub fn next_fire_in_ms(&self) -> Option<u64> {
        self.engine
            .next_fire_at()
            .map(|t| t.0.saturating_sub(self.engine.now().0))
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the simulation capability is enabled.
    pub fn is_simulation_enabled(&self) -> bool {
        self.config.simulation_enabled
    }

    /// The current per-hop delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.config.delay_ms
    }

    /// The configured allowances (palette construction).
    pub fn allowances(&self) -> &crate::config::Allowances {
        &self.config.allowances
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("gates", &self.graph.gate_count())
            .field("connections", &self.graph.connection_count())
            .field("running", &self.running)
            .field("phase", &self.engine.phase())
            .field("now", &self.engine.now())
            .finish()
    }
}
