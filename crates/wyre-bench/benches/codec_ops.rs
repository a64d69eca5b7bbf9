//! Criterion benchmarks for the circuit persistence codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wyre_graph::{decode_circuit, encode_circuit};
use wyre_test_utils::fixtures::half_adder;

/// Benchmark: encode the half-adder fixture.
fn bench_encode_half_adder(c: &mut Criterion) {
    let graph = half_adder().graph;
    c.bench_function("codec_encode_half_adder", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(256);
            encode_circuit(black_box(&graph), &mut buf).unwrap();
            black_box(&buf);
        });
    });
}

/// Benchmark: decode the same bytes back into a graph.
fn bench_decode_half_adder(c: &mut Criterion) {
    let mut encoded = Vec::with_capacity(256);
    encode_circuit(&half_adder().graph, &mut encoded).unwrap();

    c.bench_function("codec_decode_half_adder", |b| {
        b.iter(|| {
            let mut cursor = encoded.as_slice();
            let decoded = decode_circuit(&mut cursor).unwrap();
            black_box(decoded.graph.gate_count());
        });
    });
}

criterion_group!(benches, bench_encode_half_adder, bench_decode_half_adder);
criterion_main!(benches);
