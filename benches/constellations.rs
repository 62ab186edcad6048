//! Benchmarks for constellation construction
//!
//! Compares the four algorithms on the same star fields, plus the Delaunay
//! triangulation on its own.
//! Run with: `cargo bench --bench constellations`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skychart::core::celestial::ConstructionGraph;
use skychart::{
    build_constellations, generate_field, AlgorithmKind, CandidatePool, ChartConfig, CountRange,
    GenerationContext, Seeds,
};

// =============================================================================
// Benchmark Data
// =============================================================================

const STAR_COUNTS: [usize; 3] = [200, 400, 800];

fn config(star_count: usize, algorithm: AlgorithmKind) -> ChartConfig {
    let mut config = ChartConfig::default();
    config.stars.count = star_count;
    config.constellations.algorithm = algorithm.to_string();
    config.constellations.count_range = CountRange(8, 8);
    config.constellations.star_count_range = CountRange(5, 5);
    config
}

// =============================================================================
// Construction Benchmarks
// =============================================================================

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_constellations");

    for algorithm in AlgorithmKind::ALL {
        for star_count in STAR_COUNTS {
            let config = config(star_count, algorithm);
            let mut ctx = GenerationContext::new(Seeds::new(7, 0, 0));
            let field = generate_field(&config, &mut ctx.star_rng).unwrap();

            group.bench_with_input(
                BenchmarkId::new(algorithm.as_str(), star_count),
                &field,
                |b, field| {
                    b.iter(|| {
                        let mut field = field.clone();
                        let mut ctx = GenerationContext::new(Seeds::new(7, 11, 13));
                        build_constellations(black_box(&mut field), &config.constellations, &mut ctx).unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate_pool");

    for star_count in STAR_COUNTS {
        let config = config(star_count, AlgorithmKind::Delaunay);
        let mut ctx = GenerationContext::new(Seeds::new(3, 0, 0));
        let field = generate_field(&config, &mut ctx.star_rng).unwrap();
        let pool = CandidatePool::select(&field, 40);

        group.bench_with_input(BenchmarkId::from_parameter(star_count), &pool, |b, pool| {
            b.iter(|| ConstructionGraph::triangulate(&field, black_box(pool.stars())).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_algorithms, bench_triangulation);
criterion_main!(benches);
