//! Criterion benchmarks for transforming observations through stages.

use std::hint::black_box;

use argus_bench::{reference_chain, REFERENCE, STRESS};
use argus_core::{Stage, Team};
use argus_test_utils::fixtures::noise_observation;
use argus_test_utils::SyntheticEnvironment;
use argus_wrappers::EnhancedObservation;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn bench_enhancement(c: &mut Criterion) {
    for (name, population) in [("reference", REFERENCE), ("stress", STRESS)] {
        let env = SyntheticEnvironment::with_population(population, 7).unwrap();
        let mut stage = EnhancedObservation::new(env, Team::Both).unwrap();
        let raw = noise_observation(population, 7);
        c.bench_function(&format!("enhance_both_{name}"), |b| {
            b.iter_batched(
                || raw.clone(),
                |obs| black_box(stage.transform(obs).unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_full_chain(c: &mut Criterion) {
    for (name, population) in [("reference", REFERENCE), ("stress", STRESS)] {
        let mut chain = reference_chain(population, 7).unwrap();
        c.bench_function(&format!("chain_observe_{name}"), |b| {
            b.iter(|| black_box(chain.observe().unwrap()));
        });
    }
}

criterion_group!(benches, bench_enhancement, bench_full_chain);
criterion_main!(benches);
