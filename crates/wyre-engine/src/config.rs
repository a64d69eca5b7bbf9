//! Simulation configuration: delay, capability switch, gate allowances.
//!
//! [`SimConfig`] is the host-supplied configuration consumed at
//! controller construction; [`validate()`](SimConfig::validate) checks
//! its invariants up front so the controller never has to.

use indexmap::IndexMap;

use wyre_core::kind::ALL_KINDS;
use wyre_core::{ConfigError, GateKind};

/// Ceiling on the propagation delay, in milliseconds.
///
/// One minute per gate-hop is already absurd for a watchable
/// simulation; the bound also keeps virtual-clock arithmetic far away
/// from `u64` saturation.
pub const MAX_DELAY_MS: u64 = 60_000;

// ── Allowances ──────────────────────────────────────────────────

/// Per-kind gate quantity limits.
///
/// `-1` = unlimited, `0` = forbidden (the host hides the kind from its
/// palette), positive = ceiling on simultaneous live gates of the kind.
#[derive(Clone, Debug)]
pub struct Allowances {
    limits: IndexMap<GateKind, i32>,
}

impl Default for Allowances {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Allowances {
    /// Every kind unlimited.
    pub fn unlimited() -> Self {
        Self {
            limits: IndexMap::new(),
        }
    }

    /// Set the allowance for one kind, returning `self` for chaining.
    pub fn with_limit(mut self, kind: GateKind, limit: i32) -> Self {
        self.limits.insert(kind, limit);
        self
    }

    /// The allowance for a kind (`-1` when never configured).
    pub fn limit(&self, kind: GateKind) -> i32 {
        self.limits.get(&kind).copied().unwrap_or(-1)
    }

    /// Whether the host palette should offer this kind at all.
    pub fn palette_visible(&self, kind: GateKind) -> bool {
        self.limit(kind) != 0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for kind in ALL_KINDS {
            let value = self.limit(kind);
            if value < -1 {
                return Err(ConfigError::InvalidAllowance { kind, value });
            }
        }
        Ok(())
    }
}

// ── SimConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a [`Simulation`].
///
/// [`Simulation`]: crate::Simulation
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Per-hop propagation delay in milliseconds. May be zero (values
    /// still advance one gate-hop per wave, just with no dwell time).
    pub delay_ms: u64,
    /// Capability switch: whether the host permits simulation at all.
    /// Independent of the runtime start/stop state.
    pub simulation_enabled: bool,
    /// Per-kind gate quantity limits.
    pub allowances: Allowances,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            delay_ms: 250,
            simulation_enabled: true,
            allowances: Allowances::default(),
        }
    }
}

impl SimConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::DelayOutOfRange { ms: self.delay_ms });
        }
        self.allowances.validate()
    }
}
