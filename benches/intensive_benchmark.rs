// Intensive benchmark suite for InsightX
// Scales row counts, dimension counts and combination search depth
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use insightx::prelude::*;
use insightx_insight::{CombinationSearch, InsightConfig, SubspaceScope};
use rand::prelude::*;

fn generate_table(rows: usize, dimensions: usize, cardinality: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|_| {
            let mut row = Row::new();
            for d in 0..dimensions {
                let member = rng.random_range(0..cardinality);
                row.insert(format!("d{}", d), Value::text(format!("m{}", member)));
            }
            row.insert("sales".to_string(), Value::number(rng.random_range(0.0..500.0)));
            row.insert("profit".to_string(), Value::number(rng.random_range(-50.0..150.0)));
            row
        })
        .collect()
}

fn dimension_fields(n: usize) -> Vec<Field> {
    (0..n).map(|d| Field::nominal(format!("d{}", d))).collect()
}

fn measure_fields() -> Vec<Field> {
    vec![Field::quantitative("sales"), Field::quantitative("profit")]
}

// Test different dataset sizes
fn benchmark_row_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_scaling");
    group.sample_size(10); // Fewer samples for large datasets

    for size in [1_000, 10_000, 50_000].iter() {
        let table = generate_table(*size, 3, 8, 1);
        let dims = dimension_fields(3);
        let measures = measure_fields();
        group.bench_with_input(BenchmarkId::new("member_scope", size), size, |b, _| {
            let analyzer = SubspaceAnalyzer::default();
            b.iter(|| black_box(analyzer.analyze(black_box(&table), &dims, &measures).unwrap()));
        });
    }

    group.finish();
}

// Test subset enumeration depth
fn benchmark_combination_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("combination_depth");
    group.sample_size(10);

    let table = generate_table(10_000, 6, 5, 2);
    let dims = dimension_fields(6);
    let measures = measure_fields();

    for depth in [1usize, 2, 3, 4].iter() {
        group.bench_with_input(BenchmarkId::new("subsets", depth), depth, |b, &depth| {
            let analyzer = SubspaceAnalyzer::new(AnalysisConfig {
                search: CombinationSearch::Subsets { max_size: depth },
                scope: SubspaceScope::Combination,
                ..Default::default()
            });
            b.iter(|| black_box(analyzer.analyze(black_box(&table), &dims, &measures).unwrap()));
        });
    }

    group.finish();
}

// Test the full insight view pipeline
fn benchmark_insight_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("insight_views");
    group.sample_size(10);

    for dims_count in [2usize, 4, 6].iter() {
        let table = generate_table(5_000, *dims_count, 6, 3);
        let dims = dimension_fields(*dims_count);
        let measures = measure_fields();
        let config = InsightConfig::default();
        group.bench_with_input(BenchmarkId::new("dimensions", dims_count), dims_count, |b, _| {
            b.iter(|| black_box(insight_views(black_box(&table), &dims, &measures, &config).unwrap()));
        });
    }

    group.finish();
}

// Test the reducer-driven exploration flow
fn benchmark_explore(c: &mut Criterion) {
    let mut group = c.benchmark_group("explore");
    group.sample_size(10);

    let table = generate_table(10_000, 4, 12, 4);
    let mut fields: Vec<RoleField> = (0..4).map(|d| RoleField::dimension(format!("d{}", d))).collect();
    fields.push(RoleField::measure("sales"));
    fields.push(RoleField::measure("profit"));

    let loaded = ExploreState::default()
        .reduce(Action::LoadData {
            data_source: table,
            fields,
        })
        .unwrap();

    group.bench_function("extract_insights", |b| {
        b.iter(|| {
            black_box(
                loaded
                    .reduce(Action::ExtractInsights {
                        operator: Operator::Sum,
                    })
                    .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_row_scaling,
    benchmark_combination_depth,
    benchmark_insight_views,
    benchmark_explore
);
criterion_main!(benches);
