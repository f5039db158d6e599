//! Request and response payloads
//!
//! Requests are tagged by their `operation` field:
//!
//! ```json
//! {
//!   "operation": "combineFields",
//!   "dataSource": [{"region": "east", "sales": 3}],
//!   "dimensions": ["region"],
//!   "measures": ["sales"],
//!   "operator": "sum",
//!   "topKPercent": 0.3
//! }
//! ```

use insightx_core::{Field, FieldSummary, GroupedTable, Operator, Table};
use insightx_insight::{ClusterConfig, Subspace, View, DEFAULT_MAX_COMBINATIONS, DEFAULT_MAX_COMBINATION_SIZE, DEFAULT_TOP_K_PERCENT};
use serde::{Deserialize, Serialize};

fn default_top_k_percent() -> f64 {
    DEFAULT_TOP_K_PERCENT
}

fn default_max_combination_size() -> usize {
    DEFAULT_MAX_COMBINATION_SIZE
}

fn default_max_combinations() -> usize {
    DEFAULT_MAX_COMBINATIONS
}

/// A field given either by name or with its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Name(String),
    Typed(Field),
}

impl FieldRef {
    pub fn name(&self) -> &str {
        match self {
            FieldRef::Name(name) => name,
            FieldRef::Typed(field) => &field.name,
        }
    }
}

/// Every operation the service understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Request {
    /// Reduce high-cardinality fields
    #[serde(rename_all = "camelCase")]
    GroupFields {
        data_source: Table,
        fields: Vec<Field>,
        #[serde(default)]
        max_group_number: Option<usize>,
    },

    /// Type, entropy and cardinality of each field
    #[serde(rename_all = "camelCase")]
    FieldsSummary {
        data_source: Table,
        fields: Vec<FieldRef>,
    },

    /// Rank the member subspaces of a dimension set
    #[serde(rename_all = "camelCase")]
    CombineFields {
        data_source: Table,
        dimensions: Vec<String>,
        measures: Vec<String>,
        #[serde(default)]
        operator: Operator,
        #[serde(default = "default_top_k_percent")]
        top_k_percent: f64,
    },

    /// One chart for the given fields
    #[serde(rename_all = "camelCase")]
    FieldsAnalysis {
        data_source: Table,
        dimensions: Vec<String>,
        measures: Vec<String>,
    },

    /// One chart per top-ranked dimension combination
    #[serde(rename_all = "camelCase")]
    InsightViews {
        data_source: Table,
        dimensions: Vec<String>,
        measures: Vec<String>,
        #[serde(default)]
        operator: Operator,
        #[serde(default = "default_top_k_percent")]
        top_k_percent: f64,
        #[serde(default = "default_max_combination_size")]
        max_combination_size: usize,
        #[serde(default = "default_max_combinations")]
        max_combinations: usize,
    },

    /// Group measures that correlate
    #[serde(rename_all = "camelCase")]
    ClusterMeasures {
        data_source: Table,
        measures: Vec<String>,
        #[serde(default)]
        config: ClusterConfig,
    },
}

impl Request {
    /// The `operation` tag of this request
    pub fn operation(&self) -> &'static str {
        match self {
            Request::GroupFields { .. } => "groupFields",
            Request::FieldsSummary { .. } => "fieldsSummary",
            Request::CombineFields { .. } => "combineFields",
            Request::FieldsAnalysis { .. } => "fieldsAnalysis",
            Request::InsightViews { .. } => "insightViews",
            Request::ClusterMeasures { .. } => "clusterMeasures",
        }
    }
}

/// Payload of a successful operation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Grouped(GroupedTable),
    Summary(Vec<FieldSummary>),
    Subspaces(Vec<Subspace>),
    View(Box<View>),
    Views(Vec<View>),
    Clusters(Vec<Vec<String>>),
}

/// Envelope written back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    pub fn ok(data: ResponseData) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
