//! Criterion benchmarks for the propagation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wyre_bench::{deep_chain, wide_fanout};

const MAX_WAVES: u64 = 10_000;

/// Benchmark: settle a 256-wide splitter tree from a cold start.
fn bench_wide_fanout_settle(c: &mut Criterion) {
    c.bench_function("wide_fanout_256_settle", |b| {
        b.iter_batched(
            || wide_fanout(256),
            |mut sim| {
                sim.start().unwrap();
                assert!(sim.run_until_settled(MAX_WAVES));
                black_box(sim.metrics().waves);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: settle a 512-deep inverter chain (one gate per wave).
fn bench_deep_chain_settle(c: &mut Criterion) {
    c.bench_function("deep_chain_512_settle", |b| {
        b.iter_batched(
            || deep_chain(512),
            |mut sim| {
                sim.start().unwrap();
                assert!(sim.run_until_settled(MAX_WAVES));
                black_box(sim.metrics().gates_evaluated);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: re-toggle a settled chain (incremental wavefront).
fn bench_retoggle_settled_chain(c: &mut Criterion) {
    let mut sim = deep_chain(128);
    sim.start().unwrap();
    assert!(sim.run_until_settled(MAX_WAVES));
    let source = sim
        .graph()
        .input_gates()
        .first()
        .copied()
        .expect("chain has a source");

    let mut on = true;
    c.bench_function("retoggle_chain_128", |b| {
        b.iter(|| {
            on = !on;
            sim.set_gate_input(source, on).unwrap();
            assert!(sim.run_until_settled(MAX_WAVES));
            black_box(sim.now());
        });
    });
}

criterion_group!(
    benches,
    bench_wide_fanout_settle,
    bench_deep_chain_settle,
    bench_retoggle_settled_chain
);
criterion_main!(benches);
