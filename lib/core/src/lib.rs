//! # InsightX Core
//!
//! Core library for the InsightX visual-insight engine.
//!
//! This crate provides the tabular data model and the building blocks every
//! analysis is made of:
//!
//! - [`Value`], [`Table`], [`Field`] - In-memory rows with typed field metadata
//! - [`FieldGrouper`] - Cardinality reduction (continuous buckets, long-tail grouping)
//! - [`aggregate`] - Group-by reduction with sum / mean / count
//! - [`stats`] - Entropy and Pearson correlation
//! - [`summary`] - Per-field type inference and entropy summary
//!
//! ## Example
//!
//! ```rust
//! use insightx_core::{aggregate, Operator, Table, Value};
//! use serde_json::json;
//!
//! let table = Table::from_json(json!([
//!     {"region": "east", "sales": 10},
//!     {"region": "west", "sales": 5},
//!     {"region": "east", "sales": 3},
//! ])).unwrap();
//!
//! let totals = aggregate(&table, &["region"], &["sales"], Operator::Sum).unwrap();
//! assert_eq!(totals.len(), 2);
//! assert_eq!(totals.value(0, "sales"), &Value::number(13.0));
//! ```

pub mod aggregate;
pub mod error;
pub mod group;
pub mod stats;
pub mod summary;
pub mod table;
pub mod value;

pub use aggregate::{aggregate, aggregate_partition, GroupKey, Operator, Partition};
pub use error::{Error, Result};
pub use group::{
    group_categorical, group_continuous, grouped_name, long_tail_cutoff, FieldGrouper,
    GroupedTable, GroupingConfig, GroupingSpec, OTHERS_LABEL,
};
pub use summary::{fields_summary, infer_field_type, summarize_field, FieldSummary};
pub use table::{Field, FieldRole, FieldType, RoleField, Row, Table};
pub use value::Value;
