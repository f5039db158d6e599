//! Subspace analysis
//!
//! Enumerates candidate dimension combinations, aggregates the table for
//! each one and scores the measures with a correlation matrix. Every
//! candidate yields [`ImpurityRecord`]s that the ranker turns into
//! subspaces.

use insightx_core::stats::correlation_matrix;
use insightx_core::{aggregate_partition, Error, Field, Operator, Partition, Result, Table, Value};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default upper bound on evaluated dimension combinations
pub const DEFAULT_MAX_COMBINATIONS: usize = 256;

/// Which dimension combinations are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CombinationSearch {
    /// Only the full dimension set
    #[default]
    FullSet,
    /// Every non-empty subset of at most `max_size` dimensions
    Subsets {
        #[serde(rename = "maxSize")]
        max_size: usize,
    },
}

/// Granularity of the emitted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubspaceScope {
    /// One record per dimension combination
    Combination,
    /// One record per distinct member tuple of each combination
    #[default]
    Member,
}

/// Configuration for [`SubspaceAnalyzer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub operator: Operator,
    pub search: CombinationSearch,
    pub scope: SubspaceScope,
    /// Enumeration stops after this many combinations
    pub max_combinations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            operator: Operator::Sum,
            search: CombinationSearch::FullSet,
            scope: SubspaceScope::Member,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
        }
    }
}

/// A dimension pinned to one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

/// Raw analytical output for one candidate subspace
#[derive(Debug, Clone)]
pub struct ImpurityRecord {
    /// Dimensions the table was grouped by
    pub dimensions: Vec<String>,
    /// Dimension values of the slice; empty for combination-scope records
    pub members: Vec<Member>,
    /// Reduced value of each measure
    pub aggregated_values: BTreeMap<String, f64>,
    /// Pearson matrix over the measures, in measure order
    pub correlation_matrix: Vec<Vec<f64>>,
    /// Metadata of every dimension and measure involved
    pub field_meta: BTreeMap<String, Field>,
    /// The table aggregated by `dimensions`
    pub aggregated_data: Arc<Table>,
}

/// Enumerate the dimension combinations to evaluate
///
/// Subsets come out by size, then in the order the dimensions were given.
/// Enumeration is cut at `max_combinations`.
pub fn enumerate_combinations(
    dimensions: &[String],
    search: CombinationSearch,
    max_combinations: usize,
) -> Result<Vec<Vec<String>>> {
    if max_combinations == 0 {
        return Err(Error::InvalidConfig("maxCombinations must be positive".to_string()));
    }

    let max_size = match search {
        CombinationSearch::FullSet => return Ok(vec![dimensions.to_vec()]),
        CombinationSearch::Subsets { max_size: 0 } => {
            return Err(Error::InvalidConfig("maxSize must be positive".to_string()));
        }
        CombinationSearch::Subsets { max_size } => max_size.min(dimensions.len()),
    };

    let n = dimensions.len();
    let mut combos = Vec::new();
    'sizes: for k in 1..=max_size {
        let mut idx: Vec<usize> = (0..k).collect();
        loop {
            if combos.len() == max_combinations {
                warn!(max_combinations, "combination enumeration truncated");
                break 'sizes;
            }
            combos.push(idx.iter().map(|&i| dimensions[i].clone()).collect());

            // advance to the next k-combination
            let mut i = k;
            while i > 0 && idx[i - 1] == n - k + i - 1 {
                i -= 1;
            }
            if i == 0 {
                break;
            }
            idx[i - 1] += 1;
            for j in i..k {
                idx[j] = idx[j - 1] + 1;
            }
        }
    }
    Ok(combos)
}

/// Scores candidate subspaces of a table
#[derive(Debug, Clone, Default)]
pub struct SubspaceAnalyzer {
    config: AnalysisConfig,
}

impl SubspaceAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Produce impurity records for every candidate combination
    ///
    /// Combinations are evaluated in parallel; records are returned in
    /// enumeration order, so the output is deterministic. An empty table
    /// yields no records.
    pub fn analyze(
        &self,
        table: &Table,
        dimensions: &[Field],
        measures: &[Field],
    ) -> Result<Vec<ImpurityRecord>> {
        if dimensions.is_empty() {
            return Err(Error::InvalidConfig("dimension list is empty".to_string()));
        }
        if measures.is_empty() {
            return Err(Error::InvalidConfig("measure list is empty".to_string()));
        }

        let dimension_names: Vec<String> = dimensions.iter().map(|f| f.name.clone()).collect();
        let measure_names: Vec<String> = measures.iter().map(|f| f.name.clone()).collect();
        table.require_fields(&dimension_names)?;
        table.require_fields(&measure_names)?;

        let combos = enumerate_combinations(
            &dimension_names,
            self.config.search,
            self.config.max_combinations,
        )?;
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let meta: BTreeMap<String, Field> = dimensions
            .iter()
            .chain(measures.iter())
            .map(|f| (f.name.clone(), f.clone()))
            .collect();

        let raw_columns: Vec<Vec<Option<f64>>> = match self.config.scope {
            SubspaceScope::Member => measure_names
                .iter()
                .map(|m| table.numeric_column(m))
                .collect::<Result<_>>()?,
            SubspaceScope::Combination => Vec::new(),
        };

        let per_combo: Vec<Vec<ImpurityRecord>> = combos
            .par_iter()
            .map(|combo| self.evaluate(table, combo, &measure_names, &meta, &raw_columns))
            .collect::<Result<_>>()?;

        let records: Vec<ImpurityRecord> = per_combo.into_iter().flatten().collect();
        debug!(
            combinations = combos.len(),
            records = records.len(),
            scope = ?self.config.scope,
            "subspace analysis finished"
        );
        Ok(records)
    }

    fn evaluate(
        &self,
        table: &Table,
        combo: &[String],
        measures: &[String],
        meta: &BTreeMap<String, Field>,
        raw_columns: &[Vec<Option<f64>>],
    ) -> Result<Vec<ImpurityRecord>> {
        let op = self.config.operator;
        let partition = Partition::new(table, combo);
        let aggregated = Arc::new(aggregate_partition(table, &partition, combo, measures, op)?);

        let field_meta: BTreeMap<String, Field> = combo
            .iter()
            .chain(measures.iter())
            .filter_map(|name| meta.get(name).map(|f| (name.clone(), f.clone())))
            .collect();

        match self.config.scope {
            SubspaceScope::Combination => {
                let columns: Vec<Vec<Option<f64>>> = measures
                    .iter()
                    .map(|m| aggregated.numeric_column(m))
                    .collect::<Result<_>>()?;
                let aggregated_values = measures
                    .iter()
                    .zip(columns.iter())
                    .map(|(m, col)| (m.clone(), op.combine(col.iter().flatten().copied())))
                    .collect();

                Ok(vec![ImpurityRecord {
                    dimensions: combo.to_vec(),
                    members: Vec::new(),
                    aggregated_values,
                    correlation_matrix: correlation_matrix(&columns),
                    field_meta,
                    aggregated_data: aggregated,
                }])
            }
            SubspaceScope::Member => {
                let groups = partition.members();
                let mut records = Vec::with_capacity(groups.len());
                for (slot, rows) in groups.iter().enumerate() {
                    let slice: Vec<Vec<Option<f64>>> = raw_columns
                        .iter()
                        .map(|col| rows.iter().map(|&r| col[r]).collect())
                        .collect();
                    let aggregated_values = measures
                        .iter()
                        .map(|m| (m.clone(), aggregated.value(slot, m).to_number().unwrap_or(0.0)))
                        .collect();
                    let members = combo
                        .iter()
                        .zip(partition.keys[slot].iter())
                        .map(|(name, value)| Member {
                            name: name.clone(),
                            value: value.clone(),
                        })
                        .collect();

                    records.push(ImpurityRecord {
                        dimensions: combo.to_vec(),
                        members,
                        aggregated_values,
                        correlation_matrix: correlation_matrix(&slice),
                        field_meta: field_meta.clone(),
                        aggregated_data: Arc::clone(&aggregated),
                    });
                }
                Ok(records)
            }
        }
    }
}
