//! Integration test: feedback loops oscillate instead of erroring.
//!
//! Feedback is a feature, not a defect: a cross-coupled NOR latch must
//! hold its state, and a deliberately contradictory ring must keep
//! flipping forever. `run_until_settled` bounds the latter; nothing in
//! the engine tries to detect or reject the cycle.

use wyre_core::{GateKind, Position, Signal};
use wyre_engine::{RunPhase, SimConfig, Simulation};
use wyre_test_utils::fixtures::nor_latch;
use wyre_test_utils::{input_of, output_of};

const MAX_WAVES: u64 = 64;

#[test]
fn nor_latch_sets_and_holds() {
    let fixture = nor_latch();
    let (set, reset, q) = (fixture.set, fixture.reset, fixture.q);
    let mut sim = Simulation::from_graph(fixture.graph, SimConfig::default()).unwrap();

    // Pulse SET: Q goes high and stays high after the pulse drops.
    sim.set_gate_input(set, true).unwrap();
    sim.set_gate_input(reset, false).unwrap();
    sim.start().unwrap();
    assert!(sim.run_until_settled(MAX_WAVES));
    assert_eq!(
        sim.graph().value(input_of(sim.graph(), q, 0)),
        Some(Signal::High)
    );

    sim.set_gate_input(set, false).unwrap();
    assert!(sim.run_until_settled(MAX_WAVES));
    assert_eq!(
        sim.graph().value(input_of(sim.graph(), q, 0)),
        Some(Signal::High),
        "latch must hold Q after SET drops"
    );

    // Pulse RESET: Q drops.
    sim.set_gate_input(reset, true).unwrap();
    assert!(sim.run_until_settled(MAX_WAVES));
    assert_eq!(
        sim.graph().value(input_of(sim.graph(), q, 0)),
        Some(Signal::Low)
    );
}

#[test]
fn self_inverting_ring_never_settles() {
    // NOT feeding itself through an OR (the OR exists because both
    // ends of a connection must sit on different gates).
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let src = sim.add_gate(GateKind::Input, Position::default()).unwrap();
    let or = sim.add_gate(GateKind::Or, Position::default()).unwrap();
    let not = sim.add_gate(GateKind::Not, Position::default()).unwrap();

    let graph = sim.graph();
    let wires = [
        (output_of(graph, src, 0), input_of(graph, or, 0)),
        (output_of(graph, or, 0), input_of(graph, not, 0)),
        (output_of(graph, not, 0), input_of(graph, or, 1)),
    ];
    for (s, t) in wires {
        sim.try_connect(s, t).unwrap();
    }

    sim.set_gate_input(src, false).unwrap();
    sim.start().unwrap();

    // Every wave flips the ring; the bound is the only way out.
    assert!(!sim.run_until_settled(MAX_WAVES));
    assert_eq!(sim.phase(), RunPhase::Propagating);
    assert!(sim.metrics().waves >= MAX_WAVES);

    // Stop still works on an oscillating circuit.
    sim.stop();
    assert_eq!(sim.phase(), RunPhase::Idle);
    assert!(sim.next_fire_in_ms().is_none());
}

#[test]
fn oscillator_keeps_virtual_time_marching() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let src = sim.add_gate(GateKind::Input, Position::default()).unwrap();
    let or = sim.add_gate(GateKind::Or, Position::default()).unwrap();
    let not = sim.add_gate(GateKind::Not, Position::default()).unwrap();
    let graph = sim.graph();
    let wires = [
        (output_of(graph, src, 0), input_of(graph, or, 0)),
        (output_of(graph, or, 0), input_of(graph, not, 0)),
        (output_of(graph, not, 0), input_of(graph, or, 1)),
    ];
    for (s, t) in wires {
        sim.try_connect(s, t).unwrap();
    }
    sim.start().unwrap();

    let mut last = sim.now();
    for _ in 0..8 {
        assert!(sim.step());
        assert!(sim.now() > last, "each wave advances the clock");
        last = sim.now();
    }
}
