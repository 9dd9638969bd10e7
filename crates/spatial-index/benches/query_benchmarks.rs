//! Benchmarks for region queries, GRID against ARRAY.
//!
//! Run with: cargo bench --package spatial-index --bench query_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heatmap_common::{Region, WeightedPoint};
use rand::Rng;
use spatial_index::{IndexMode, SpatialIndex};

fn generate_points(count: usize) -> Vec<WeightedPoint> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            WeightedPoint::new(
                rng.gen_range(-90.0..=90.0),
                rng.gen_range(-180.0..180.0),
                rng.gen_range(0.0..10.0),
            )
        })
        .collect()
}

// =============================================================================
// BUILD BENCHMARKS
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for count in [1_000, 10_000, 100_000] {
        let points = generate_points(count);
        group.throughput(Throughput::Elements(count as u64));

        for mode in [IndexMode::Grid, IndexMode::Array] {
            group.bench_with_input(
                BenchmarkId::new(mode.as_str(), count),
                &points,
                |b, points| {
                    b.iter(|| SpatialIndex::build(black_box(points.clone()), mode));
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// QUERY BENCHMARKS
// =============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_query");

    let points = generate_points(100_000);
    let grid = SpatialIndex::build(points.clone(), IndexMode::Grid);
    let array = SpatialIndex::build(points, IndexMode::Array);

    let regions = [
        ("zoom0_world", Region::world()),
        ("zoom4_tile", Region::new(33.75, 45.0, -101.25, -90.0)),
        ("zoom8_tile", Region::new(40.0, 40.703125, -100.0, -99.296875)),
        ("antimeridian", Region::new(-30.0, 30.0, -225.0, -160.0)),
    ];

    for (name, region) in regions {
        group.bench_with_input(BenchmarkId::new("grid", name), &region, |b, region| {
            b.iter(|| black_box(grid.query(region)));
        });
        group.bench_with_input(BenchmarkId::new("array", name), &region, |b, region| {
            b.iter(|| black_box(array.query(region)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
