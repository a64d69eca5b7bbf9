//! Well-known circuits used across the workspace's test suites.
//!
//! Four standard fixtures:
//!
//! - [`half_adder`] — XOR/AND pair, the canonical combinational check.
//! - [`inverter_chain`] — N NOT gates in series, for wavefront timing.
//! - [`splitter_fanout`] — one source mirrored to two displays.
//! - [`nor_latch`] — cross-coupled NORs, the canonical feedback loop.

use wyre_core::{GateId, GateKind, Position};
use wyre_graph::CircuitGraph;

use crate::{input_of, output_of};

/// A half adder: `sum = a XOR b`, `carry = a AND b`.
pub struct HalfAdder {
    pub graph: CircuitGraph,
    pub a: GateId,
    pub b: GateId,
    pub xor: GateId,
    pub and: GateId,
    /// Display gate showing the sum bit.
    pub sum: GateId,
    /// Display gate showing the carry bit.
    pub carry: GateId,
}

pub fn half_adder() -> HalfAdder {
    let mut graph = CircuitGraph::new();
    let a = graph.add_gate(GateKind::Input, Position::new(0, 0));
    let b = graph.add_gate(GateKind::Input, Position::new(0, 80));
    let xor = graph.add_gate(GateKind::Xor, Position::new(120, 0));
    let and = graph.add_gate(GateKind::And, Position::new(120, 80));
    let sum = graph.add_gate(GateKind::Output, Position::new(240, 0));
    let carry = graph.add_gate(GateKind::Output, Position::new(240, 80));

    let wires = [
        (output_of(&graph, a, 0), input_of(&graph, xor, 0)),
        (output_of(&graph, a, 0), input_of(&graph, and, 0)),
        (output_of(&graph, b, 0), input_of(&graph, xor, 1)),
        (output_of(&graph, b, 0), input_of(&graph, and, 1)),
        (output_of(&graph, xor, 0), input_of(&graph, sum, 0)),
        (output_of(&graph, and, 0), input_of(&graph, carry, 0)),
    ];
    for (source, target) in wires {
        graph
            .try_connect(source, target)
            .expect("half adder wiring is valid");
    }

    HalfAdder {
        graph,
        a,
        b,
        xor,
        and,
        sum,
        carry,
    }
}

/// An inverter chain: INPUT -> NOT x `n` -> OUTPUT.
pub struct InverterChain {
    pub graph: CircuitGraph,
    pub source: GateId,
    pub inverters: Vec<GateId>,
    pub display: GateId,
}

pub fn inverter_chain(n: usize) -> InverterChain {
    let mut graph = CircuitGraph::new();
    let source = graph.add_gate(GateKind::Input, Position::new(0, 0));
    let mut inverters = Vec::with_capacity(n);
    let mut tail = output_of(&graph, source, 0);
    for i in 0..n {
        let not = graph.add_gate(GateKind::Not, Position::new(100 * (i as i32 + 1), 0));
        graph
            .try_connect(tail, input_of(&graph, not, 0))
            .expect("chain wiring is valid");
        tail = output_of(&graph, not, 0);
        inverters.push(not);
    }
    let display = graph.add_gate(GateKind::Output, Position::new(100 * (n as i32 + 1), 0));
    graph
        .try_connect(tail, input_of(&graph, display, 0))
        .expect("chain wiring is valid");

    InverterChain {
        graph,
        source,
        inverters,
        display,
    }
}

/// One source through a splitter to two display gates.
pub struct SplitterFanout {
    pub graph: CircuitGraph,
    pub source: GateId,
    pub splitter: GateId,
    pub displays: [GateId; 2],
}

pub fn splitter_fanout() -> SplitterFanout {
    let mut graph = CircuitGraph::new();
    let source = graph.add_gate(GateKind::Input, Position::new(0, 40));
    let splitter = graph.add_gate(GateKind::Splitter, Position::new(100, 40));
    let top = graph.add_gate(GateKind::Output, Position::new(200, 0));
    let bottom = graph.add_gate(GateKind::Output, Position::new(200, 80));

    let wires = [
        (output_of(&graph, source, 0), input_of(&graph, splitter, 0)),
        (output_of(&graph, splitter, 0), input_of(&graph, top, 0)),
        (output_of(&graph, splitter, 1), input_of(&graph, bottom, 0)),
    ];
    for (s, t) in wires {
        graph.try_connect(s, t).expect("fanout wiring is valid");
    }

    SplitterFanout {
        graph,
        source,
        splitter,
        displays: [top, bottom],
    }
}

/// Cross-coupled NOR latch: SET and RESET inputs, Q and Q-bar displays.
///
/// The feedback ring makes this the standard oscillation fixture: with
/// both inputs low the latch holds, and driving both then releasing
/// produces the classic race.
pub struct NorLatch {
    pub graph: CircuitGraph,
    pub set: GateId,
    pub reset: GateId,
    pub nor_q: GateId,
    pub nor_qbar: GateId,
    pub q: GateId,
    pub qbar: GateId,
}

pub fn nor_latch() -> NorLatch {
    let mut graph = CircuitGraph::new();
    let set = graph.add_gate(GateKind::Input, Position::new(0, 0));
    let reset = graph.add_gate(GateKind::Input, Position::new(0, 120));
    let nor_q = graph.add_gate(GateKind::Nor, Position::new(140, 20));
    let nor_qbar = graph.add_gate(GateKind::Nor, Position::new(140, 100));
    let q = graph.add_gate(GateKind::Output, Position::new(280, 20));
    let qbar = graph.add_gate(GateKind::Output, Position::new(280, 100));

    let wires = [
        (output_of(&graph, reset, 0), input_of(&graph, nor_q, 0)),
        (output_of(&graph, nor_qbar, 0), input_of(&graph, nor_q, 1)),
        (output_of(&graph, set, 0), input_of(&graph, nor_qbar, 1)),
        (output_of(&graph, nor_q, 0), input_of(&graph, nor_qbar, 0)),
        (output_of(&graph, nor_q, 0), input_of(&graph, q, 0)),
        (output_of(&graph, nor_qbar, 0), input_of(&graph, qbar, 0)),
    ];
    for (s, t) in wires {
        graph.try_connect(s, t).expect("latch wiring is valid");
    }

    NorLatch {
        graph,
        set,
        reset,
        nor_q,
        nor_qbar,
        q,
        qbar,
    }
}
