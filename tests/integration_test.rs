// Integration tests for InsightX
use insightx::prelude::*;
use insightx_core::group::{categorical_labels, continuous_labels, GroupingSpec, DEFAULT_TAIL_MULTIPLIER};
use insightx_core::OTHERS_LABEL;
use insightx_insight::{assign_channels, FieldImpurity, MeasureValue};
use serde_json::json;
use std::io::Write;
use std::process::Command;

fn region_sales() -> Table {
    let rows: Vec<_> = (1..=10)
        .map(|i| json!({"region": format!("r{:02}", i), "sales": i}))
        .collect();
    Table::from_json(serde_json::Value::Array(rows)).unwrap()
}

fn categorical(counts: &[(&str, usize)]) -> Table {
    let rows: Vec<_> = counts
        .iter()
        .flat_map(|(name, n)| std::iter::repeat(json!({"cat": name})).take(*n))
        .collect();
    Table::from_json(serde_json::Value::Array(rows)).unwrap()
}

#[test]
fn test_region_sales_scenario() {
    let table = region_sales();
    let records = SubspaceAnalyzer::default()
        .analyze(&table, &[Field::nominal("region")], &[Field::quantitative("sales")])
        .unwrap();
    assert_eq!(records.len(), 10);

    let subspaces = SubspaceRanker::new(0.3)
        .unwrap()
        .rank(records, &["sales".to_string()], Operator::Sum);

    assert_eq!(subspaces.len(), 3);
    for (i, subspace) in subspaces.iter().enumerate() {
        let expected = (i + 1) as f64;
        assert_eq!(subspace.score, expected);
        assert_eq!(
            subspace.measures,
            vec![MeasureValue {
                name: "sales".to_string(),
                value: expected
            }]
        );
    }
}

#[test]
fn test_subspace_search_idempotent() {
    let run = || {
        let request: Request = serde_json::from_value(json!({
            "operation": "combineFields",
            "dataSource": region_sales(),
            "dimensions": ["region"],
            "measures": ["sales"],
            "operator": "sum",
            "topKPercent": 0.3
        }))
        .unwrap();
        serde_json::to_string(&Service::default().respond(request)).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_result_count_for_any_fraction() {
    let table = region_sales();
    for p in [0.05, 0.1, 0.25, 0.5, 0.75, 1.0] {
        let records = SubspaceAnalyzer::default()
            .analyze(&table, &[Field::nominal("region")], &[Field::quantitative("sales")])
            .unwrap();
        let ranked = SubspaceRanker::new(p).unwrap().rank(records, &["sales".to_string()], Operator::Sum);
        assert_eq!(ranked.len(), (p * 10.0).round() as usize);
        assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
    }
}

#[test]
fn test_long_tail_power_law() {
    let table = categorical(&[("A", 50), ("B", 30), ("C", 10), ("D", 5), ("E", 3), ("F", 2)]);
    let spec = GroupingSpec::new("cat", 4);
    let (labels, categories) = categorical_labels(&table, &spec, DEFAULT_TAIL_MULTIPLIER).unwrap();

    assert_eq!(categories, 2);
    assert_eq!(labels.iter().filter(|v| **v == Value::text("A")).count(), 50);
    assert_eq!(labels.iter().filter(|v| **v == Value::text(OTHERS_LABEL)).count(), 50);
}

#[test]
fn test_long_tail_without_break_is_copy() {
    let table = categorical(&[("A", 10), ("B", 9), ("C", 8), ("D", 7)]);
    let spec = GroupingSpec::new("cat", 4);
    let (labels, categories) = categorical_labels(&table, &spec, DEFAULT_TAIL_MULTIPLIER).unwrap();

    assert_eq!(categories, 4);
    let source: Vec<Value> = table.column("cat").cloned().collect();
    assert_eq!(labels, source);
}

#[test]
fn test_bucketing_covers_every_value() {
    let table = region_sales();
    for k in 1..=6 {
        let labels = continuous_labels(&table, &GroupingSpec::new("sales", k)).unwrap();
        let mut distinct: Vec<String> = labels.iter().map(|v| v.to_string()).collect();
        distinct.sort();
        distinct.dedup();
        assert!(distinct.len() <= k);
        assert!(labels.iter().all(|v| !v.is_null()));
        if k > 1 {
            assert!(distinct.iter().any(|l| l.starts_with("[-Infinity")));
            assert!(distinct.iter().any(|l| l.ends_with("Infinity)")));
        }
    }
}

#[test]
fn test_grouping_leaves_input_untouched() {
    let table = region_sales();
    let before = table.clone();
    let grouped = FieldGrouper::default()
        .group_fields(&table, &[Field::quantitative("sales"), Field::nominal("region")])
        .unwrap();

    assert_eq!(table, before);
    assert!(grouped.grouped_data.has_field("sales(group)"));
    assert!(grouped.grouped_data.has_field("region(group)"));
    assert_eq!(grouped.grouped_data.len(), table.len());
}

#[test]
fn test_nominal_region_collapses_to_interval() {
    let rows: Vec<_> = (0..25).map(|i| json!({"region": format!("r{}", i), "sales": i})).collect();
    let aggregated = Table::from_json(serde_json::Value::Array(rows)).unwrap();
    let scores = vec![
        FieldImpurity {
            field: Field::nominal("region"),
            role: FieldRole::Dimension,
            entropy: 0.0,
            max_entropy: 0.0,
        },
        FieldImpurity {
            field: Field::quantitative("sales"),
            role: FieldRole::Measure,
            entropy: 0.0,
            max_entropy: 0.0,
        },
    ];

    let spec = SpecificationBuilder::new().build(&scores, aggregated);
    assert_eq!(spec.schema.geom_type, vec![GeomType::Interval]);
}

#[test]
fn test_channel_capacity_for_mixed_fields() {
    for n in 0..40 {
        let ranked: Vec<Field> = (0..n)
            .map(|i| Field::new(format!("f{}", i), FieldType::ALL[(i * 7 + n) % 4]))
            .collect();
        let assignment = assign_channels(&ranked);
        for channel in Channel::ALL {
            if let Some(cap) = channel.capacity() {
                assert!(assignment.get(channel).len() <= cap);
            }
        }
    }
}

#[test]
fn test_explore_flow() {
    let rows: Vec<_> = (0..40)
        .map(|i| {
            json!({
                "city": format!("c{}", i % 8),
                "segment": if i % 3 == 0 { "corp" } else { "retail" },
                "sales": (i % 8) * 10 + 1,
                "profit": i % 5,
            })
        })
        .collect();
    let session = Session::new(ExploreConfig::default()).unwrap();
    session
        .dispatch(Action::LoadData {
            data_source: Table::from_json(serde_json::Value::Array(rows)).unwrap(),
            fields: vec![
                RoleField::dimension("city"),
                RoleField::dimension("segment"),
                RoleField::measure("sales"),
                RoleField::measure("profit"),
            ],
        })
        .unwrap();
    let state = session
        .dispatch(Action::ExtractInsights {
            operator: Operator::Sum,
        })
        .unwrap();

    assert_eq!(state.summary.origin.len(), 4);
    assert!(!state.subspace_list.is_empty());
    assert!(state.subspace_list.windows(2).all(|w| w[0].score <= w[1].score));
    assert!(!state.view_spaces.is_empty());
    for view in &state.view_spaces {
        assert!(!view.specification.schema.channels.position().is_empty());
    }
}

#[test]
fn test_cli_runs_request_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let request = json!({
        "operation": "combineFields",
        "dataSource": region_sales(),
        "dimensions": ["region"],
        "measures": ["sales"]
    });
    write!(file, "{}", request).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_insightx"))
        .args(["--log-level", "error", "run"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], true);
    let scores: Vec<f64> = response["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["score"].as_f64().unwrap())
        .collect();
    assert_eq!(scores, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_cli_reports_errors_in_envelope() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!({"operation": "clusterMeasures", "dataSource": [{"a": 1}], "measures": ["b"]})
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_insightx"))
        .args(["run", "--log-level", "error"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Field not found: b");
}
