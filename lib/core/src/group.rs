//! Field grouping (cardinality reduction)
//!
//! Two strategies reduce a column to a bounded set of categories:
//!
//! - **Continuous bucketing** splits the numeric range into equal-width
//!   intervals. The outer intervals are open towards infinity so every finite
//!   value lands in exactly one bucket.
//! - **Long-tail grouping** keeps the dominant head of a categorical
//!   frequency distribution and folds the tail into a single `"others"`
//!   category.
//!
//! Grouping never touches the input table: derived columns are written into
//! a copy.

use crate::stats::member_count;
use crate::table::{Field, FieldType, Table};
use crate::value::{format_number, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label for values folded into the long tail
pub const OTHERS_LABEL: &str = "others";

/// Label for rows that fall into no bucket (missing or non-numeric)
pub const MISSING_LABEL: &str = "null";

/// Suffix appended to a field name to name its grouped column
pub const GROUP_SUFFIX: &str = "(group)";

/// Default threshold multiplier of the long-tail scan
pub const DEFAULT_TAIL_MULTIPLIER: f64 = 5.0;

/// Default number of categories a grouped field is reduced to
pub const DEFAULT_MAX_GROUP_NUMBER: usize = 4;

/// Describes the reduction of one field into a derived field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingSpec {
    pub source_field: String,
    pub derived_field_name: String,
    pub group_count: usize,
}

impl GroupingSpec {
    /// Spec deriving `"<field>(group)"` with at most `group_count` categories
    pub fn new(source_field: impl Into<String>, group_count: usize) -> Self {
        let source_field = source_field.into();
        Self {
            derived_field_name: grouped_name(&source_field),
            source_field,
            group_count,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.group_count == 0 {
            return Err(Error::InvalidConfig(format!(
                "groupCount for '{}' must be positive",
                self.source_field
            )));
        }
        Ok(())
    }
}

/// Name of the grouped column derived from `field`
pub fn grouped_name(field: &str) -> String {
    format!("{}{}", field, GROUP_SUFFIX)
}

/// Configuration for [`FieldGrouper`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupingConfig {
    /// Fields with more distinct values than this are grouped
    pub max_group_number: usize,
    /// Multiplier of the long-tail break detection
    pub tail_multiplier: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_group_number: DEFAULT_MAX_GROUP_NUMBER,
            tail_multiplier: DEFAULT_TAIL_MULTIPLIER,
        }
    }
}

/// A half-open interval `[left, right)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub left: f64,
    pub right: f64,
}

impl Bucket {
    pub fn contains(&self, value: f64) -> bool {
        self.left <= value && value < self.right
    }

    pub fn label(&self) -> String {
        format!("[{}, {})", format_number(self.left), format_number(self.right))
    }
}

/// Split `[min, max]` into `k` equal-width buckets with open outer bounds
pub fn bucket_ranges(min: f64, max: f64, k: usize) -> Vec<Bucket> {
    let width = (max - min) / k as f64;
    let mut buckets: Vec<Bucket> = (0..k)
        .map(|i| Bucket {
            left: min + i as f64 * width,
            right: min + (i + 1) as f64 * width,
        })
        .collect();
    if let Some(first) = buckets.first_mut() {
        first.left = f64::NEG_INFINITY;
    }
    if let Some(last) = buckets.last_mut() {
        last.right = f64::INFINITY;
    }
    buckets
}

/// Labels of the continuous bucketing of `spec.source_field`, one per row
pub fn continuous_labels(table: &Table, spec: &GroupingSpec) -> Result<Vec<Value>> {
    spec.validate()?;
    let numbers: Vec<Option<f64>> = table
        .column(&spec.source_field)
        .map(|v| v.to_number())
        .collect();

    let (min, max) = numbers
        .iter()
        .flatten()
        .fold(None, |acc: Option<(f64, f64)>, &n| match acc {
            None => Some((n, n)),
            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
        })
        .ok_or_else(|| {
            Error::EmptyInput(format!(
                "field '{}' has no numeric values to bucket",
                spec.source_field
            ))
        })?;

    let buckets = bucket_ranges(min, max, spec.group_count);
    let labels: Vec<String> = buckets.iter().map(Bucket::label).collect();

    Ok(numbers
        .iter()
        .map(|n| {
            n.and_then(|n| buckets.iter().position(|b| b.contains(n)))
                .map(|i| Value::text(labels[i].as_str()))
                .unwrap_or_else(|| Value::text(MISSING_LABEL))
        })
        .collect())
}

/// Bucket a continuous field into `spec.group_count` ranges
///
/// Returns a copy of the table with the derived column added. Fails with
/// [`Error::EmptyInput`] when the field holds no numeric value at all, since
/// the range would be undefined.
pub fn group_continuous(table: &Table, spec: &GroupingSpec) -> Result<Table> {
    let labels = continuous_labels(table, spec)?;
    table.with_columns(vec![(spec.derived_field_name.clone(), labels)])
}

/// Detect the break of a long-tailed frequency distribution
///
/// `counts` must be sorted descending. Returns the number of derived
/// categories (`i + 2` at the first matching rank `i`), or `None` when the
/// distribution shows no break worth reducing.
///
/// The scan stops at the first rank where
/// `count[i] * m >= S[i + 1]` and `count[i + 1] / m < S[i + 2]`, `S` being
/// suffix sums. At that rank the kept prefix must hold at least as much mass
/// as the tail it would fold away, otherwise no reduction happens.
pub fn long_tail_cutoff(counts: &[usize], multiplier: f64) -> Option<usize> {
    let n = counts.len();
    if n < 3 {
        return None;
    }

    let mut suffix = vec![0usize; n + 1];
    for i in (0..n).rev() {
        suffix[i] = suffix[i + 1] + counts[i];
    }
    let total = suffix[0];

    for i in 0..n - 2 {
        let head = counts[i] as f64 * multiplier >= suffix[i + 1] as f64;
        let tail = (counts[i + 1] as f64 / multiplier) < suffix[i + 2] as f64;
        if head && tail {
            let tail_mass = suffix[i + 1];
            if total - tail_mass >= tail_mass {
                return Some(i + 2);
            }
            return None;
        }
    }
    None
}

/// Labels of the long-tail grouping of `spec.source_field`, one per row
///
/// Also returns the resulting number of categories.
pub fn categorical_labels(
    table: &Table,
    spec: &GroupingSpec,
    multiplier: f64,
) -> Result<(Vec<Value>, usize)> {
    spec.validate()?;
    let mut members = member_count(table.column(&spec.source_field));
    // stable: ties keep first-appearance order
    members.sort_by(|a, b| b.1.cmp(&a.1));
    let counts: Vec<usize> = members.iter().map(|(_, c)| *c).collect();

    let cutoff = match long_tail_cutoff(&counts, multiplier) {
        Some(cutoff) => cutoff.min(spec.group_count.max(1)),
        None => {
            debug!(field = %spec.source_field, members = members.len(), "no long-tail break, copying field");
            let labels = table.column(&spec.source_field).cloned().collect();
            return Ok((labels, members.len()));
        }
    };

    let kept: Vec<&Value> = members[..cutoff - 1].iter().map(|(v, _)| v).collect();
    debug!(
        field = %spec.source_field,
        members = members.len(),
        kept = kept.len(),
        "folding long tail into '{}'",
        OTHERS_LABEL
    );

    let labels = table
        .column(&spec.source_field)
        .map(|v| {
            if kept.contains(&v) {
                v.clone()
            } else {
                Value::text(OTHERS_LABEL)
            }
        })
        .collect();
    Ok((labels, cutoff))
}

/// Fold the long tail of a categorical field into `"others"`
pub fn group_categorical(table: &Table, spec: &GroupingSpec, multiplier: f64) -> Result<Table> {
    let (labels, _) = categorical_labels(table, spec, multiplier)?;
    table.with_columns(vec![(spec.derived_field_name.clone(), labels)])
}

/// Result of grouping several fields at once
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedTable {
    pub grouped_data: Table,
    pub new_fields: Vec<Field>,
}

/// Reduces high-cardinality fields of a table
#[derive(Debug, Clone, Default)]
pub struct FieldGrouper {
    config: GroupingConfig,
}

impl FieldGrouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Group every field whose cardinality exceeds `max_group_number`
    ///
    /// Quantitative fields are bucketed into an ordinal field; nominal and
    /// ordinal fields go through long-tail grouping into a nominal field.
    /// Temporal fields are left alone. The returned table keeps every source
    /// column next to the derived ones.
    pub fn group_fields(&self, table: &Table, fields: &[Field]) -> Result<GroupedTable> {
        if self.config.max_group_number == 0 {
            return Err(Error::InvalidConfig("maxGroupNumber must be positive".to_string()));
        }
        table.require_fields(&fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>())?;

        let mut columns = Vec::new();
        let mut new_fields = Vec::new();

        if table.is_empty() {
            return Ok(GroupedTable {
                grouped_data: table.clone(),
                new_fields,
            });
        }

        for field in fields {
            let cardinality = table.distinct_count(&field.name);
            if cardinality <= self.config.max_group_number {
                continue;
            }
            let spec = GroupingSpec::new(&field.name, self.config.max_group_number);
            let (labels, derived_type) = match field.field_type {
                FieldType::Quantitative => (continuous_labels(table, &spec)?, FieldType::Ordinal),
                FieldType::Nominal | FieldType::Ordinal => {
                    let (labels, _) = categorical_labels(table, &spec, self.config.tail_multiplier)?;
                    (labels, FieldType::Nominal)
                }
                FieldType::Temporal => continue,
            };
            debug!(field = %field.name, cardinality, derived = %spec.derived_field_name, "grouped field");
            new_fields.push(Field::new(spec.derived_field_name.clone(), derived_type));
            columns.push((spec.derived_field_name, labels));
        }

        Ok(GroupedTable {
            grouped_data: table.with_columns(columns)?,
            new_fields,
        })
    }
}
