//! # InsightX
//!
//! Visual insight recommendation for in-memory tabular data.
//!
//! Given rows and a dimension/measure tagging of their columns, InsightX
//! reduces high-cardinality columns, ranks candidate subspaces and emits
//! declarative chart specifications (channels + geometry) for the winners.
//!
//! ## Quick Start
//!
//! ### From the Command Line
//!
//! ```bash
//! insightx run request.json --pretty
//! insightx explore --data rows.json --dimensions region,year --measures sales
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use insightx::prelude::*;
//! use serde_json::json;
//!
//! let table = Table::from_json(json!([
//!     {"region": "east", "sales": 3},
//!     {"region": "west", "sales": 1},
//!     {"region": "north", "sales": 2},
//! ])).unwrap();
//!
//! let view = fields_view(&table, &[Field::nominal("region")], &[Field::quantitative("sales")]).unwrap();
//! assert_eq!(view.specification.schema.geom_type, vec![GeomType::Interval]);
//! ```
//!
//! ## Crate Structure
//!
//! InsightX is composed of several crates:
//!
//! - `insightx-core` - Table model, grouping, aggregation, entropy and correlation
//! - `insightx-insight` - Subspace analysis, ranking, field impurity, specification builder
//! - `insightx-api` - Closed request enum and JSON dispatch
//! - `insightx-explore` - Immutable exploration state driven by a reducer

// Re-export core types
pub use insightx_core::{
    aggregate, Error, Field, FieldGrouper, FieldRole, FieldSummary, FieldType, GroupingConfig,
    Operator, Result, RoleField, Row, Table, Value,
};

// Re-export insight
pub use insightx_insight::{
    fields_view, insight_views, AnalysisConfig, ChannelAssignment, Channel, GeomType,
    MeasureClusterer, SpecificationBuilder, Subspace, SubspaceAnalyzer, SubspaceRanker, View,
    ViewSpecification,
};

// Re-export API and explore
pub use insightx_api::{Request, Response, Service};
pub use insightx_explore::{Action, ExploreConfig, ExploreState, Session};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        aggregate, fields_view, insight_views, Action, AnalysisConfig, Channel, Error,
        ExploreConfig, ExploreState, Field, FieldGrouper, FieldRole, FieldType, GeomType,
        GroupingConfig, Operator, Request, Result, RoleField, Row, Service, Session,
        SpecificationBuilder, Subspace, SubspaceAnalyzer, SubspaceRanker, Table, Value, View,
    };
}
