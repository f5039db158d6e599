//! # InsightX Explore
//!
//! The exploration flow of InsightX as immutable snapshots.
//!
//! An [`ExploreState`] is advanced by applying [`Action`]s through the pure
//! [`ExploreState::reduce`]. [`Session`] keeps the latest snapshot for
//! concurrent readers.
//!
//! ## Example
//!
//! ```rust
//! use insightx_core::{Operator, RoleField, Table};
//! use insightx_explore::{Action, ExploreState};
//! use serde_json::json;
//!
//! let data = Table::from_json(json!([
//!     {"region": "east", "sales": 1},
//!     {"region": "west", "sales": 2},
//! ])).unwrap();
//!
//! let state = ExploreState::default()
//!     .reduce(Action::LoadData {
//!         data_source: data,
//!         fields: vec![RoleField::dimension("region"), RoleField::measure("sales")],
//!     })
//!     .unwrap()
//!     .reduce(Action::ExtractInsights { operator: Operator::Sum })
//!     .unwrap();
//!
//! assert_eq!(state.summary.origin.len(), 2);
//! ```

pub mod action;
pub mod session;
pub mod state;

pub use action::Action;
pub use session::Session;
pub use state::{ExploreConfig, ExploreState, Summary, DEFAULT_DIMENSION_SIZE};
