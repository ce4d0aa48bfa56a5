//! Criterion micro-benchmarks for layout derivation.

use std::hint::black_box;

use argus_bench::{REFERENCE, STRESS};
use argus_core::Population;
use argus_layout::{compute_camera_layout, compute_target_layout, LayoutSet};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_layouts(c: &mut Criterion) {
    let profiles: [(&str, Population); 2] = [("reference", REFERENCE), ("stress", STRESS)];
    for (name, population) in profiles {
        c.bench_function(&format!("camera_layout_{name}"), |b| {
            b.iter(|| compute_camera_layout(black_box(&population)).unwrap());
        });
        c.bench_function(&format!("target_layout_{name}"), |b| {
            b.iter(|| compute_target_layout(black_box(&population)).unwrap());
        });
        c.bench_function(&format!("layout_set_{name}"), |b| {
            b.iter(|| LayoutSet::derive(black_box(population)).unwrap());
        });
    }
}

criterion_group!(benches, bench_layouts);
criterion_main!(benches);
