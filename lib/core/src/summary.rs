//! Univariate field summaries
//!
//! Infers a semantic type for each field and measures how spread out its
//! values are (Shannon entropy over the member distribution).

use crate::stats::{entropy, max_entropy, member_count};
use crate::table::{FieldType, Table};
use crate::value::Value;
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Summary of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Shannon entropy (bits) of the present values
    pub entropy: f64,
    /// `log2(distinct_count)`
    pub max_entropy: f64,
    /// Number of distinct present values
    pub distinct_count: usize,
    /// Number of rows where the field is absent
    pub missing_count: usize,
}

/// Infer the semantic type of a column from its present values
///
/// All-numeric columns are quantitative, all date-like text columns are
/// temporal, anything else is nominal. Columns without a present value are
/// nominal.
pub fn infer_field_type(table: &Table, field: &str) -> FieldType {
    let mut present = table.column(field).filter(|v| !v.is_null()).peekable();
    if present.peek().is_none() {
        return FieldType::Nominal;
    }

    let values: Vec<&Value> = present.collect();
    if values.iter().all(|v| matches!(v, Value::Number(_))) {
        return FieldType::Quantitative;
    }
    if values.iter().all(|v| v.as_str().map(is_temporal).unwrap_or(false)) {
        return FieldType::Temporal;
    }
    if values.iter().all(|v| v.to_number().is_some()) {
        return FieldType::Quantitative;
    }
    FieldType::Nominal
}

/// Whether a string looks like a date or timestamp
pub fn is_temporal(s: &str) -> bool {
    let s = s.trim();
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
    {
        return true;
    }
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || NaiveDate::parse_from_str(s, "%Y/%m/%d").is_ok() {
        return true;
    }
    // year-month
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_ok()
}

/// Summarize one field
pub fn summarize_field(table: &Table, field: &str) -> Result<FieldSummary> {
    table.require_fields(&[field])?;

    let members = member_count(table.column(field));
    let missing_count = members
        .iter()
        .find(|(v, _)| v.is_null())
        .map(|(_, c)| *c)
        .unwrap_or(0);
    let counts: Vec<usize> = members
        .iter()
        .filter(|(v, _)| !v.is_null())
        .map(|(_, c)| *c)
        .collect();

    Ok(FieldSummary {
        field_name: field.to_string(),
        field_type: infer_field_type(table, field),
        entropy: entropy(&counts),
        max_entropy: max_entropy(counts.len()),
        distinct_count: counts.len(),
        missing_count,
    })
}

/// Summarize several fields, in the given order
pub fn fields_summary<S: AsRef<str>>(table: &Table, fields: &[S]) -> Result<Vec<FieldSummary>> {
    fields
        .iter()
        .map(|f| summarize_field(table, f.as_ref()))
        .collect()
}
