use std::io::Cursor;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cachelib::config::{CacheConfig, ReplacementPolicyConfig, WritePolicyConfig};
use cachelib::simulator::Simulator;
use cachelib::trace::TraceSchema;
use cachelib::util::{render_trace, synthetic_operations};

const OPERATIONS: usize = 200_000;

/// Replays the same synthetic trace under every policy combination
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Policies");
    let schema = TraceSchema::flagged();
    let operations = synthetic_operations(OPERATIONS, 0);
    // For the purposes of this we aren't interested in IO effects, the trace is kept in memory
    let trace = render_trace(&operations, &schema);
    group.throughput(Throughput::Elements(OPERATIONS as u64));

    let replacement_policies = [
        ReplacementPolicyConfig::Random,
        ReplacementPolicyConfig::Lru,
        ReplacementPolicyConfig::Fifo,
        ReplacementPolicyConfig::Lfu,
    ];
    for replacement_policy in replacement_policies {
        for write_policy in [WritePolicyConfig::WriteBack, WritePolicyConfig::WriteThrough] {
            let config = CacheConfig::new(64, 32 * 1024, 8, replacement_policy, write_policy).unwrap();
            let id = BenchmarkId::new(replacement_policy.to_string(), write_policy);
            group.bench_with_input(id, &config, |bench, config| {
                bench.iter(|| {
                    let mut simulator = Simulator::with_seed(config, schema.clone(), Some(0)).unwrap();
                    simulator.simulate(Cursor::new(trace.as_bytes())).unwrap().cycles()
                });
            });
            group.bench_with_input(BenchmarkId::new(format!("{replacement_policy}/parsed"), write_policy), &config, |bench, config| {
                bench.iter(|| {
                    let mut simulator = Simulator::with_seed(config, schema.clone(), Some(0)).unwrap();
                    simulator.simulate_operations(operations.iter().copied()).cycles()
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
