//! Criterion benchmarks for u-steiner drivers.
//!
//! Uses synthetic instances (random points in a constrained rectangle) to
//! measure triangulation construction and driver throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_steiner::aco::{AcoConfig, AcoRunner};
use u_steiner::geometry::Point;
use u_steiner::local::{LocalSearchConfig, LocalSearchRunner};
use u_steiner::problem::Instance;
use u_steiner::sa::{SaConfig, SaRunner};

// ===========================================================================
// Random points in a 100 x 60 rectangle
// ===========================================================================

fn random_instance(n: usize, seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 60.0),
        Point::new(0.0, 60.0),
    ];
    points.extend(
        (0..n).map(|_| Point::new(rng.random_range(1.0..99.0), rng.random_range(1.0..59.0))),
    );
    Instance::new(points, vec![0, 1, 2, 3], vec![])
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &n in &[50, 200, 1000] {
        let instance = random_instance(n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &instance, |b, inst| {
            b.iter(|| black_box(inst.build()))
        });
    }
    group.finish();
}

fn bench_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");
    group.sample_size(10);

    for &n in &[20, 50] {
        let (tri, region) = random_instance(n, 42).build().unwrap();
        let config = LocalSearchConfig::default().with_max_passes(20).with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(tri, region, config),
            |b, (t, r, c)| {
                b.iter(|| {
                    let result = LocalSearchRunner::run(t.clone(), r.clone(), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);

    for &n in &[20, 50] {
        let (tri, region) = random_instance(n, 42).build().unwrap();
        let config = SaConfig::default().with_max_iterations(200).with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(tri, region, config),
            |b, (t, r, c)| {
                b.iter(|| {
                    let result = SaRunner::run(t.clone(), r.clone(), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_aco(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco");
    group.sample_size(10);

    for &n in &[20, 50] {
        let (tri, region) = random_instance(n, 42).build().unwrap();
        let config = AcoConfig::default().with_cycles(50).with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(tri, region, config),
            |b, (t, r, c)| {
                b.iter(|| {
                    let result = AcoRunner::run(t.clone(), r.clone(), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_local_search, bench_sa, bench_aco);
criterion_main!(benches);
