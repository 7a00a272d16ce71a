use basketgraph::{
    AnalysisConfig, BasketAnalyzer, BipartiteGraph, CategoryTable, ElasticityEstimator,
    NullModelSampler, RelationshipScorer, ScoringConfig, TransactionRecord,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Synthetic baskets: each transaction buys 2-4 of `products` items, with
/// prices drifting by transaction so elasticity has something to fit.
fn synthetic_baskets(transactions: u64, products: u64) -> Vec<TransactionRecord> {
    let mut records = Vec::new();
    for t in 1..=transactions {
        let width = 2 + t % 3;
        for k in 0..width {
            let product = (t * 7 + k * 13) % products;
            let price = 1.0 + ((t + k) % 10) as f64 * 0.1;
            records.push(TransactionRecord::new(
                t,
                format!("P{}", product),
                1 + (t % 4) as u32,
                price,
            ));
        }
    }
    records
}

fn categories(products: u64) -> CategoryTable {
    (0..products)
        .map(|p| (format!("P{}", p), format!("C{}", p % 5)))
        .collect()
}

/// Benchmark bipartite graph construction
fn bench_bipartite_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bipartite_build");

    for size in [1_000u64, 10_000].iter() {
        let records = synthetic_baskets(*size, 200);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let graph = BipartiteGraph::build(&records).unwrap();
                criterion::black_box(graph.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark null model sampling across trial counts
fn bench_null_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("null_model");
    group.sample_size(10);

    let graph = BipartiteGraph::build(&synthetic_baskets(500, 50)).unwrap();
    for trials in [10usize, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(trials), trials, |b, &trials| {
            b.iter(|| {
                let (stats, _) = NullModelSampler::new(trials, 7).sample(&graph).unwrap();
                criterion::black_box(stats.len());
            });
        });
    }
    group.finish();
}

/// Benchmark z-score and diffusion scoring over precomputed null statistics
fn bench_scoring(c: &mut Criterion) {
    let graph = BipartiteGraph::build(&synthetic_baskets(500, 50)).unwrap();
    let (stats, _) = NullModelSampler::new(20, 7).sample(&graph).unwrap();
    let scorer = RelationshipScorer::new(ScoringConfig::default());

    c.bench_function("scoring", |b| {
        b.iter(|| {
            criterion::black_box(scorer.score(&graph, &stats).len());
        });
    });
}

fn bench_elasticity(c: &mut Criterion) {
    let records = synthetic_baskets(10_000, 200);
    let estimator = ElasticityEstimator::new();

    c.bench_function("elasticity", |b| {
        b.iter(|| {
            criterion::black_box(estimator.estimate(&records).len());
        });
    });
}

/// Benchmark the full analysis end to end
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let records = synthetic_baskets(500, 50);
    let categories = categories(50);
    let mut config = AnalysisConfig::default();
    config.null_model.trials = 50;
    config.null_model.seed = Some(42);
    let analyzer = BasketAnalyzer::new(config);

    group.bench_function("500_transactions", |b| {
        b.iter(|| {
            let report = analyzer.run(&records, &categories).unwrap();
            criterion::black_box(report.complements.len());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_bipartite_build,
    bench_null_model,
    bench_scoring,
    bench_elasticity,
    bench_pipeline,
);
criterion_main!(benches);
