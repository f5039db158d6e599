//! Exploration state
//!
//! An [`ExploreState`] is an immutable snapshot. Tables are shared through
//! `Arc`, so producing the next snapshot only copies what changed.

use insightx_core::group::DEFAULT_MAX_GROUP_NUMBER;
use insightx_core::{Error, Field, FieldSummary, Result, RoleField, Table};
use insightx_insight::{Subspace, View, DEFAULT_TOP_K_PERCENT};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default fraction of dimensions kept for subspace search
pub const DEFAULT_DIMENSION_SIZE: f64 = 0.72;

/// Tuning of the exploration flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExploreConfig {
    /// Fraction of ranked subspaces kept
    pub subspace_percent_size: f64,
    /// Fraction of entropy-ordered dimensions searched
    pub dimension_size: f64,
    pub max_group_number: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            subspace_percent_size: DEFAULT_TOP_K_PERCENT,
            dimension_size: DEFAULT_DIMENSION_SIZE,
            max_group_number: DEFAULT_MAX_GROUP_NUMBER,
        }
    }
}

impl ExploreConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.subspace_percent_size > 0.0 && self.subspace_percent_size <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "subspacePercentSize must be in (0, 1], got {}",
                self.subspace_percent_size
            )));
        }
        if !(self.dimension_size > 0.0 && self.dimension_size <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "dimensionSize must be in (0, 1], got {}",
                self.dimension_size
            )));
        }
        if self.max_group_number == 0 {
            return Err(Error::InvalidConfig("maxGroupNumber must be positive".to_string()));
        }
        Ok(())
    }
}

/// Field summaries before and after grouping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub origin: Vec<FieldSummary>,
    /// Only the fields derived by grouping
    pub grouped: Vec<FieldSummary>,
}

impl Summary {
    /// Entropy of a field, grouped summaries first
    pub fn entropy_of(&self, field: &str) -> Option<f64> {
        self.grouped
            .iter()
            .chain(self.origin.iter())
            .find(|s| s.field_name == field)
            .map(|s| s.entropy)
    }
}

/// One snapshot of an exploration session
#[derive(Debug, Clone, Default)]
pub struct ExploreState {
    pub config: ExploreConfig,
    /// Data as loaded
    pub raw_data: Arc<Table>,
    /// Role of every field
    pub fields: Vec<RoleField>,
    /// Data with grouped columns, ready for search
    pub cooked_data: Arc<Table>,
    /// Typed dimensions after grouping; entropy-ordered once searched
    pub cooked_dimensions: Vec<Field>,
    pub cooked_measures: Vec<Field>,
    pub summary: Summary,
    /// Ranked subspaces, lowest score first
    pub subspace_list: Vec<Subspace>,
    pub view_spaces: Vec<View>,
}

impl ExploreState {
    /// Empty state with the given tuning
    pub fn new(config: ExploreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    pub fn dimension_names(&self) -> Vec<String> {
        self.cooked_dimensions.iter().map(|f| f.name.clone()).collect()
    }

    pub fn measure_names(&self) -> Vec<String> {
        self.cooked_measures.iter().map(|f| f.name.clone()).collect()
    }

    pub fn is_summarized(&self) -> bool {
        !self.summary.origin.is_empty()
    }
}
