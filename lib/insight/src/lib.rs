//! # InsightX Insight
//!
//! Subspace search and chart specification for InsightX tables.
//!
//! This crate finds the dimension slices worth looking at and turns them into
//! declarative chart specifications.
//!
//! ## Features
//!
//! - **Subspace Analysis**: Aggregate per dimension combination, Pearson matrix per slice
//! - **Ranking**: Order subspaces by aggregate magnitude and keep the top fraction
//! - **Field Impurity**: Rank fields by normalized entropy
//! - **Specification Builder**: Priority-driven channel assignment and geometry selection
//! - **Measure Clustering**: Group correlated measures
//!
//! ## Example
//!
//! ```rust
//! use insightx_core::{Field, Operator, Table};
//! use insightx_insight::{SubspaceAnalyzer, SubspaceRanker};
//! use serde_json::json;
//!
//! let table = Table::from_json(json!([
//!     {"region": "east", "sales": 3},
//!     {"region": "west", "sales": 1},
//!     {"region": "north", "sales": 2},
//! ])).unwrap();
//!
//! let records = SubspaceAnalyzer::default()
//!     .analyze(&table, &[Field::nominal("region")], &[Field::quantitative("sales")])
//!     .unwrap();
//! let top = SubspaceRanker::new(0.7)
//!     .unwrap()
//!     .rank(records, &["sales".to_string()], Operator::Sum);
//!
//! assert_eq!(top.len(), 2);
//! assert_eq!(top[0].score, 1.0);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Table     │────>│  Analyzer   │────>│   Ranker    │
//! │ (grouped)   │     │ (records)   │     │ (top k %)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │ Spec Builder│<────│   Fields    │
//!                     │ (channels)  │     │ (entropy)   │
//!                     └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │    View     │
//!                     │(schema+data)│
//!                     └─────────────┘
//! ```

pub mod analysis;
pub mod cluster;
pub mod fields;
pub mod rank;
pub mod spec;
pub mod view;

// Re-export main types for convenience
pub use analysis::{
    enumerate_combinations,
    AnalysisConfig,
    CombinationSearch,
    ImpurityRecord,
    Member,
    SubspaceAnalyzer,
    SubspaceScope,
    DEFAULT_MAX_COMBINATIONS,
};
pub use cluster::{ClusterConfig, MeasureClusterer};
pub use fields::{analyze_fields, FieldImpurity, FieldsAnalysis};
pub use rank::{MeasureValue, RankConfig, Subspace, SubspaceRanker, DEFAULT_TOP_K_PERCENT};
pub use spec::{
    assign_channels,
    channel_priority,
    Channel,
    ChannelAssignment,
    GeomType,
    SpecificationBuilder,
    ViewSchema,
    ViewSpecification,
};
pub use view::{fields_view, insight_views, InsightConfig, View, DEFAULT_MAX_COMBINATION_SIZE};
