// Benchmarks for the InsightX pipeline stages
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use insightx::prelude::*;
use rand::prelude::*;
use serde_json::json;

const REGIONS: [&str; 12] = [
    "north", "south", "east", "west", "center", "coast", "hills", "lakes", "plains", "delta",
    "islands", "valley",
];

fn generate_table(rows: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<_> = (0..rows)
        .map(|_| {
            json!({
                "region": REGIONS[rng.random_range(0..REGIONS.len())],
                "segment": if rng.random_bool(0.3) { "corp" } else { "retail" },
                "year": rng.random_range(2015..2025),
                "sales": rng.random_range(0.0..1000.0),
                "profit": rng.random_range(-100.0..300.0),
            })
        })
        .collect();
    Table::from_json(serde_json::Value::Array(data)).unwrap()
}

fn benchmark_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_fields");

    for size in [1_000, 10_000].iter() {
        let table = generate_table(*size, 7);
        let fields = [
            Field::nominal("region"),
            Field::quantitative("sales"),
            Field::ordinal("year"),
        ];
        group.bench_with_input(BenchmarkId::new("insightx", size), size, |b, _| {
            let grouper = FieldGrouper::default();
            b.iter(|| black_box(grouper.group_fields(black_box(&table), &fields).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let table = generate_table(10_000, 11);

    for op in [Operator::Sum, Operator::Mean, Operator::Count] {
        group.bench_function(format!("{:?}", op).to_lowercase(), |b| {
            b.iter(|| {
                black_box(aggregate(black_box(&table), &["region", "segment"], &["sales", "profit"], op).unwrap())
            });
        });
    }

    group.finish();
}

fn benchmark_subspace_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("subspace_search");
    let table = generate_table(5_000, 13);
    let dims = [Field::nominal("region"), Field::nominal("segment")];
    let measures = [Field::quantitative("sales"), Field::quantitative("profit")];
    let names = vec!["sales".to_string(), "profit".to_string()];

    group.bench_function("member_scope", |b| {
        let analyzer = SubspaceAnalyzer::default();
        let ranker = SubspaceRanker::new(0.3).unwrap();
        b.iter(|| {
            let records = analyzer.analyze(black_box(&table), &dims, &measures).unwrap();
            black_box(ranker.rank(records, &names, Operator::Sum))
        });
    });

    group.finish();
}

fn benchmark_specification(c: &mut Criterion) {
    let mut group = c.benchmark_group("specification");
    let table = generate_table(5_000, 17);

    group.bench_function("fields_view", |b| {
        b.iter(|| {
            black_box(
                fields_view(
                    black_box(&table),
                    &[Field::nominal("region"), Field::nominal("segment")],
                    &[Field::quantitative("sales")],
                )
                .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_grouping,
    benchmark_aggregate,
    benchmark_subspace_search,
    benchmark_specification
);
criterion_main!(benches);
