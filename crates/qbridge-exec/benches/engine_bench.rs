//! Engine throughput benchmarks
//!
//! Run with: cargo bench -p qbridge-exec

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qbridge_adapter_exact::ExactAdapter;
use qbridge_adapter_moment::MomentAdapter;
use qbridge_adapter_sim::SimAdapter;
use qbridge_adapter_stabilizer::StabilizerAdapter;
use qbridge_exec::similarity;
use qbridge_hal::{Backend, EngineConfig};
use qbridge_ir::library::{self, BenchmarkKind};

fn engines() -> Vec<Box<dyn Backend>> {
    let config = EngineConfig::new().with_seed(7);
    vec![
        Box::new(SimAdapter::from_config(&config)),
        Box::new(MomentAdapter::from_config(&config)),
        Box::new(StabilizerAdapter::from_config(&config)),
        Box::new(ExactAdapter::from_config(&config)),
    ]
}

/// GHZ circuits of growing width on every engine.
fn bench_ghz(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_1000_shots");
    for engine in engines() {
        for num_qubits in [4, 8, 12] {
            let spec = library::ghz(num_qubits).unwrap();
            group.bench_with_input(
                BenchmarkId::new(engine.name().to_string(), num_qubits),
                &spec,
                |b, spec| b.iter(|| engine.run(black_box(spec), 1000)),
            );
        }
    }
    group.finish();
}

/// Layered H/CX benchmark circuit, Clifford-only so every engine takes it.
fn bench_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_100_shots");
    let spec = library::benchmark(BenchmarkKind::Layered, 10).unwrap();
    for engine in engines() {
        group.bench_function(engine.name().to_string(), |b| {
            b.iter(|| engine.run(black_box(&spec), 100));
        });
    }
    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let engine = SimAdapter::from_config(&EngineConfig::new().with_seed(1));
    let spec = library::benchmark(BenchmarkKind::Layered, 12).unwrap();
    let a = engine.run(&spec, 10_000);
    let b = engine.run(&spec, 10_000);
    let (pa, pb) = (a.probabilities().unwrap(), b.probabilities().unwrap());
    c.bench_function("similarity_layered_12", |bench| {
        bench.iter(|| similarity(black_box(pa), black_box(pb)));
    });
}

criterion_group!(benches, bench_ghz, bench_layered, bench_similarity);
criterion_main!(benches);
