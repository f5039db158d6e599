//! Field impurity analysis
//!
//! Ranks the dimensions and measures of a view by how evenly their mass is
//! spread. The ranked list drives channel assignment in
//! [`crate::spec::SpecificationBuilder`].

use insightx_core::stats::{entropy, max_entropy, member_count, weighted_entropy};
use insightx_core::{aggregate, Error, Field, FieldRole, Operator, Result, Table};
use serde::{Deserialize, Serialize};

/// Entropy profile of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldImpurity {
    pub field: Field,
    pub role: FieldRole,
    pub entropy: f64,
    pub max_entropy: f64,
}

impl FieldImpurity {
    /// Entropy relative to its maximum, `0.0` for single-valued fields
    pub fn normalized(&self) -> f64 {
        if self.max_entropy > 0.0 {
            self.entropy / self.max_entropy
        } else {
            0.0
        }
    }
}

/// Ranked fields plus the table aggregated by every dimension
#[derive(Debug, Clone)]
pub struct FieldsAnalysis {
    pub field_scores: Vec<FieldImpurity>,
    pub aggregated_data: Table,
}

/// Score and rank the fields of a view
///
/// The table is summed by all dimensions. A dimension's entropy comes from
/// its member frequencies on the raw rows; a measure's entropy from the
/// shares of its aggregated values. Fields are ordered by ascending
/// normalized entropy, ties kept in input order (dimensions first).
pub fn analyze_fields(table: &Table, dimensions: &[Field], measures: &[Field]) -> Result<FieldsAnalysis> {
    if dimensions.is_empty() {
        return Err(Error::InvalidConfig("dimension list is empty".to_string()));
    }
    if measures.is_empty() {
        return Err(Error::InvalidConfig("measure list is empty".to_string()));
    }

    let dimension_names: Vec<&str> = dimensions.iter().map(|f| f.name.as_str()).collect();
    let measure_names: Vec<&str> = measures.iter().map(|f| f.name.as_str()).collect();
    table.require_fields(&dimension_names)?;
    table.require_fields(&measure_names)?;

    let aggregated_data = aggregate(table, &dimension_names, &measure_names, Operator::Sum)?;

    let mut field_scores = Vec::with_capacity(dimensions.len() + measures.len());
    for field in dimensions {
        let counts: Vec<usize> = member_count(table.column(&field.name))
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        field_scores.push(FieldImpurity {
            field: field.clone(),
            role: FieldRole::Dimension,
            entropy: entropy(&counts),
            max_entropy: max_entropy(counts.len()),
        });
    }
    for field in measures {
        let values: Vec<f64> = aggregated_data
            .numeric_column(&field.name)?
            .into_iter()
            .flatten()
            .collect();
        field_scores.push(FieldImpurity {
            field: field.clone(),
            role: FieldRole::Measure,
            entropy: weighted_entropy(&values),
            max_entropy: max_entropy(values.len()),
        });
    }

    field_scores.sort_by(|a, b| a.normalized().total_cmp(&b.normalized()));

    Ok(FieldsAnalysis {
        field_scores,
        aggregated_data,
    })
}
