//! Benchmark profiles for the Wyre circuit engine.
//!
//! Pre-built circuits large enough to exercise the propagation hot
//! path:
//!
//! - [`wide_fanout`]: one source splittered out to `width` displays.
//! - [`deep_chain`]: `depth` inverters in series.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use wyre_core::{GateKind, Position};
use wyre_engine::{SimConfig, Simulation};
use wyre_graph::CircuitGraph;

fn bench_config() -> SimConfig {
    // Zero dwell time: benchmarks measure wave execution, not waiting.
    SimConfig {
        delay_ms: 0,
        ..SimConfig::default()
    }
}

/// One input fanned out through a splitter tree to `width` displays.
///
/// `width` is rounded up to the next power of two by the tree shape.
pub fn wide_fanout(width: usize) -> Simulation {
    let mut graph = CircuitGraph::new();
    let source = graph.add_gate(GateKind::Input, Position::default());
    let mut frontier = vec![graph.gate(source).expect("just added").outputs[0]];

    while frontier.len() < width {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for tail in frontier {
            let split = graph.add_gate(GateKind::Splitter, Position::default());
            let record = graph.gate(split).expect("just added");
            let (input, outs) = (record.inputs[0], [record.outputs[0], record.outputs[1]]);
            graph.try_connect(tail, input).expect("tree wiring is valid");
            next.extend(outs);
        }
        frontier = next;
    }
    for tail in frontier {
        let display = graph.add_gate(GateKind::Output, Position::default());
        let input = graph.gate(display).expect("just added").inputs[0];
        graph.try_connect(tail, input).expect("tree wiring is valid");
    }

    let mut sim = Simulation::from_graph(graph, bench_config()).expect("config is valid");
    sim.set_gate_input(source, true).expect("source is an input");
    sim
}

/// `depth` NOT gates in series behind one input.
pub fn deep_chain(depth: usize) -> Simulation {
    let mut graph = CircuitGraph::new();
    let source = graph.add_gate(GateKind::Input, Position::default());
    let mut tail = graph.gate(source).expect("just added").outputs[0];
    for _ in 0..depth {
        let not = graph.add_gate(GateKind::Not, Position::default());
        let record = graph.gate(not).expect("just added");
        let (input, output) = (record.inputs[0], record.outputs[0]);
        graph.try_connect(tail, input).expect("chain wiring is valid");
        tail = output;
    }

    let mut sim = Simulation::from_graph(graph, bench_config()).expect("config is valid");
    sim.set_gate_input(source, true).expect("source is an input");
    sim
}
