//! Subspace ranking
//!
//! Turns impurity records into scored [`Subspace`]s and keeps the top
//! fraction.
//!
//! The score of a record is the plain sum of its reduced measure values.
//! Subspaces are ordered by ascending score, so slices with the smallest
//! aggregate magnitude come first. Despite the "impurity" naming upstream,
//! no entropy is involved at this stage.

use crate::analysis::{ImpurityRecord, Member};
use insightx_core::{Error, Field, Operator, Result, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Default fraction of subspaces returned by a search
pub const DEFAULT_TOP_K_PERCENT: f64 = 0.3;

/// One measure and its reduced value in a subspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureValue {
    pub name: String,
    pub value: f64,
}

/// A ranked candidate subspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subspace {
    /// Sum of the measure values
    pub score: f64,
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    pub measures: Vec<MeasureValue>,
    pub correlation_matrix: Vec<Vec<f64>>,
    #[serde(skip)]
    pub field_meta: BTreeMap<String, Field>,
    #[serde(skip)]
    pub aggregated_data: Arc<Table>,
}

/// Serializable settings for [`SubspaceRanker`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankConfig {
    pub top_k_percent: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_k_percent: DEFAULT_TOP_K_PERCENT,
        }
    }
}

/// Scores, orders and truncates impurity records
#[derive(Debug, Clone)]
pub struct SubspaceRanker {
    top_k_percent: f64,
}

impl Default for SubspaceRanker {
    fn default() -> Self {
        Self {
            top_k_percent: DEFAULT_TOP_K_PERCENT,
        }
    }
}

impl SubspaceRanker {
    /// Create a ranker keeping `top_k_percent` of the records
    ///
    /// `top_k_percent` must lie in `(0, 1]`.
    pub fn new(top_k_percent: f64) -> Result<Self> {
        if !(top_k_percent > 0.0 && top_k_percent <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "topKPercent must be in (0, 1], got {}",
                top_k_percent
            )));
        }
        Ok(Self { top_k_percent })
    }

    pub fn from_config(config: RankConfig) -> Result<Self> {
        Self::new(config.top_k_percent)
    }

    pub fn top_k_percent(&self) -> f64 {
        self.top_k_percent
    }

    /// Score of a record: sum of the requested measures (absent counts 0)
    pub fn score(record: &ImpurityRecord, measures: &[String]) -> f64 {
        measures
            .iter()
            .map(|m| record.aggregated_values.get(m).copied().unwrap_or(0.0))
            .sum()
    }

    /// Rank records and keep the first `round(top_k_percent * N)`
    ///
    /// The sort is stable, so equal scores keep their enumeration order and
    /// repeated runs on the same input give the same list. `operator` only
    /// annotates the trace output; the records are already reduced.
    pub fn rank(
        &self,
        records: Vec<ImpurityRecord>,
        measures: &[String],
        operator: Operator,
    ) -> Vec<Subspace> {
        let total = records.len();
        let mut scored: Vec<(f64, ImpurityRecord)> = records
            .into_iter()
            .map(|r| (Self::score(&r, measures), r))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        let end = ((self.top_k_percent * total as f64).round() as usize).min(total);
        debug!(total, kept = end, ?operator, "ranked subspaces");

        scored
            .into_iter()
            .take(end)
            .map(|(score, record)| Subspace {
                score,
                measures: measures
                    .iter()
                    .map(|m| MeasureValue {
                        name: m.clone(),
                        value: record.aggregated_values.get(m).copied().unwrap_or(0.0),
                    })
                    .collect(),
                dimensions: record.dimensions,
                members: record.members,
                correlation_matrix: record.correlation_matrix,
                field_meta: record.field_meta,
                aggregated_data: record.aggregated_data,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dim: &str, sales: f64, profit: f64) -> ImpurityRecord {
        ImpurityRecord {
            dimensions: vec![dim.to_string()],
            members: Vec::new(),
            aggregated_values: BTreeMap::from([
                ("sales".to_string(), sales),
                ("profit".to_string(), profit),
            ]),
            correlation_matrix: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            field_meta: BTreeMap::new(),
            aggregated_data: Arc::new(Table::default()),
        }
    }

    fn measures() -> Vec<String> {
        vec!["sales".to_string(), "profit".to_string()]
    }

    #[test]
    fn test_invalid_top_k() {
        for p in [0.0, -0.1, 1.01, f64::NAN] {
            assert!(matches!(SubspaceRanker::new(p), Err(Error::InvalidConfig(_))));
        }
        assert!(SubspaceRanker::new(1.0).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config: RankConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RankConfig::default());
        let ranker = SubspaceRanker::from_config(config).unwrap();
        assert_eq!(ranker.top_k_percent(), DEFAULT_TOP_K_PERCENT);
    }

    #[test]
    fn test_rank_ascending_and_truncated() {
        let records = vec![
            record("a", 10.0, 5.0),
            record("b", 1.0, 1.0),
            record("c", 4.0, 0.0),
            record("d", 7.0, 7.0),
        ];
        let ranked = SubspaceRanker::new(0.5).unwrap().rank(records, &measures(), Operator::Sum);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].dimensions, vec!["b".to_string()]);
        assert_eq!(ranked[0].score, 2.0);
        assert_eq!(ranked[1].dimensions, vec!["c".to_string()]);
        assert_eq!(
            ranked[1].measures,
            vec![
                MeasureValue { name: "sales".into(), value: 4.0 },
                MeasureValue { name: "profit".into(), value: 0.0 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let records = vec![record("x", 1.0, 1.0), record("y", 2.0, 0.0), record("z", 0.0, 2.0)];
        let ranked = SubspaceRanker::new(1.0).unwrap().rank(records, &measures(), Operator::Sum);
        let dims: Vec<_> = ranked.iter().map(|s| s.dimensions[0].as_str()).collect();
        assert_eq!(dims, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_result_count_is_rounded() {
        let ranker = SubspaceRanker::new(0.3).unwrap();
        for n in 0..20 {
            let records: Vec<_> = (0..n).map(|i| record("d", i as f64, 0.0)).collect();
            let ranked = ranker.rank(records, &measures(), Operator::Sum);
            assert_eq!(ranked.len(), (0.3 * n as f64).round() as usize);
        }
    }

    #[test]
    fn test_small_fraction_may_be_empty() {
        let ranked = SubspaceRanker::new(0.1)
            .unwrap()
            .rank(vec![record("a", 1.0, 1.0)], &measures(), Operator::Sum);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_missing_measure_scores_zero() {
        let ranked = SubspaceRanker::new(1.0).unwrap().rank(
            vec![record("a", 3.0, 1.0)],
            &["sales".to_string(), "margin".to_string()],
            Operator::Sum,
        );
        assert_eq!(ranked[0].score, 3.0);
        assert_eq!(ranked[0].measures[1].value, 0.0);
    }

    #[test]
    fn test_subspace_serialization() {
        let ranked = SubspaceRanker::new(1.0)
            .unwrap()
            .rank(vec![record("a", 1.0, 2.0)], &measures(), Operator::Sum);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["score"], 3.0);
        assert!(json.get("correlationMatrix").is_some());
        assert!(json.get("members").is_none());
        assert!(json.get("aggregatedData").is_none());
    }
}
