//! In-memory tables and field metadata

use crate::value::{Value, NULL};
use crate::{Error, Result};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A table row: field name to cell value
pub type Row = BTreeMap<String, Value>;

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Ordinal,
    Nominal,
    Temporal,
}

impl FieldType {
    /// Every semantic type in channel-assignment order
    pub const ALL: [FieldType; 4] = [
        FieldType::Quantitative,
        FieldType::Ordinal,
        FieldType::Nominal,
        FieldType::Temporal,
    ];
}

/// Role of a field chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Dimension,
    Measure,
}

/// A named column with its semantic type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn quantitative(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Quantitative)
    }

    pub fn ordinal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Ordinal)
    }

    pub fn nominal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Nominal)
    }

    pub fn temporal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Temporal)
    }
}

/// A field tagged with its user-assigned role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleField {
    pub name: String,
    #[serde(rename = "type")]
    pub role: FieldRole,
}

impl RoleField {
    pub fn dimension(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: FieldRole::Dimension }
    }

    pub fn measure(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: FieldRole::Measure }
    }
}

/// An ordered sequence of rows
///
/// Tables are never mutated by the engine. Operations that derive new
/// columns return a new table and leave the input untouched, so one table can
/// be shared between concurrent analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Parse a table from a JSON array of objects
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value of `field` in row `index`, `Null` when absent
    pub fn value(&self, index: usize, field: &str) -> &Value {
        self.rows
            .get(index)
            .and_then(|row| row.get(field))
            .unwrap_or(&NULL)
    }

    /// Iterate over one column, yielding `Null` for rows missing the field
    pub fn column<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(field).unwrap_or(&NULL))
    }

    /// Read a column as numbers
    ///
    /// Absent values become `None`. Any other non-numeric value is a
    /// [`Error::TypeMismatch`].
    pub fn numeric_column(&self, field: &str) -> Result<Vec<Option<f64>>> {
        self.column(field)
            .map(|value| numeric_cell(field, value))
            .collect()
    }

    /// Whether at least one row carries `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(field))
    }

    /// Fail with [`Error::FieldNotFound`] when a non-empty table lacks a field
    pub fn require_fields<S: AsRef<str>>(&self, fields: &[S]) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        for field in fields {
            if !self.has_field(field.as_ref()) {
                return Err(Error::FieldNotFound(field.as_ref().to_string()));
            }
        }
        Ok(())
    }

    /// Number of distinct values in a column (absent counts as one value)
    pub fn distinct_count(&self, field: &str) -> usize {
        self.column(field).collect::<AHashSet<_>>().len()
    }

    /// Copy of this table with extra columns appended
    ///
    /// Each entry pairs a column name with one value per row. An existing
    /// column of the same name is replaced in the copy.
    pub fn with_columns(&self, columns: Vec<(String, Vec<Value>)>) -> Result<Table> {
        for (name, values) in &columns {
            if values.len() != self.rows.len() {
                return Err(Error::InvalidConfig(format!(
                    "column '{}' has {} values for {} rows",
                    name,
                    values.len(),
                    self.rows.len()
                )));
            }
        }

        let mut rows = self.rows.clone();
        for (name, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.clone(), value);
            }
        }
        Ok(Table { rows })
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Table::new(rows)
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}

pub(crate) fn numeric_cell(field: &str, value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        other => other.to_number().map(Some).ok_or_else(|| Error::TypeMismatch {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_json(json!([
            {"region": "east", "sales": 10},
            {"region": "west", "sales": "12.5"},
            {"region": "east"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_from_json_and_column() {
        let table = sample();
        assert_eq!(table.len(), 3);
        let regions: Vec<_> = table.column("region").cloned().collect();
        assert_eq!(regions, vec![Value::text("east"), Value::text("west"), Value::text("east")]);
        assert!(table.value(2, "sales").is_null());
    }

    #[test]
    fn test_numeric_column() {
        let table = sample();
        assert_eq!(table.numeric_column("sales").unwrap(), vec![Some(10.0), Some(12.5), None]);
        assert!(matches!(
            table.numeric_column("region"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_with_columns_copies() {
        let table = sample();
        let derived = table
            .with_columns(vec![("flag".to_string(), vec![Value::Bool(true); 3])])
            .unwrap();
        assert!(derived.has_field("flag"));
        assert!(!table.has_field("flag"));
    }

    #[test]
    fn test_with_columns_length_mismatch() {
        let table = sample();
        let result = table.with_columns(vec![("flag".to_string(), vec![Value::Null])]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_distinct_and_required_fields() {
        let table = sample();
        assert_eq!(table.distinct_count("region"), 2);
        assert!(table.require_fields(&["region"]).is_ok());
        assert!(matches!(
            table.require_fields(&["profit"]),
            Err(Error::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_field_serde() {
        let field: Field = serde_json::from_value(json!({"name": "sales", "type": "quantitative"})).unwrap();
        assert_eq!(field, Field::quantitative("sales"));
        let role: RoleField = serde_json::from_value(json!({"name": "region", "type": "dimension"})).unwrap();
        assert_eq!(role, RoleField::dimension("region"));
    }
}
