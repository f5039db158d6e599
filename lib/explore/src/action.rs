//! Exploration actions and the reducer applying them
//!
//! ```text
//! LoadData ──> UnivariateSummary ──> SubspaceSearch ──> views
//!              └──────────────── ExtractInsights ─────────────┘
//! ```
//!
//! [`ExploreState::reduce`] never mutates `self`. A failed action returns
//! the error and the caller keeps the previous snapshot.

use crate::state::{ExploreState, Summary};
use insightx_core::{
    fields_summary, Error, Field, FieldGrouper, FieldRole, FieldType, GroupingConfig, Operator,
    Result, RoleField, Table,
};
use insightx_insight::{fields_view, AnalysisConfig, SubspaceAnalyzer, SubspaceRanker, View};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Every transition of an exploration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Replace the data and reset every derived result
    #[serde(rename_all = "camelCase")]
    LoadData { data_source: Table, fields: Vec<RoleField> },

    /// Summarize fields and group high-cardinality dimensions
    UnivariateSummary,

    /// Rank subspaces over the lowest-entropy dimensions
    SubspaceSearch {
        #[serde(default)]
        operator: Operator,
    },

    /// Summary, search and one view per searched dimension set
    ExtractInsights {
        #[serde(default)]
        operator: Operator,
    },
}

impl ExploreState {
    /// Apply an action, producing the next snapshot
    pub fn reduce(&self, action: Action) -> Result<ExploreState> {
        match action {
            Action::LoadData { data_source, fields } => self.load_data(data_source, fields),
            Action::UnivariateSummary => self.univariate_summary(),
            Action::SubspaceSearch { operator } => self.subspace_search(operator),
            Action::ExtractInsights { operator } => self
                .univariate_summary()?
                .subspace_search(operator)?
                .build_views(),
        }
    }

    fn load_data(&self, data: Table, fields: Vec<RoleField>) -> Result<ExploreState> {
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        data.require_fields(&names)?;
        info!(rows = data.len(), fields = fields.len(), "data loaded");

        let data = Arc::new(data);
        Ok(ExploreState {
            config: self.config.clone(),
            raw_data: Arc::clone(&data),
            fields,
            cooked_data: data,
            ..Default::default()
        })
    }

    fn univariate_summary(&self) -> Result<ExploreState> {
        let dimensions = self.role_names(FieldRole::Dimension);
        let measures = self.role_names(FieldRole::Measure);
        if dimensions.is_empty() {
            return Err(Error::InvalidConfig("no dimension fields loaded".to_string()));
        }
        if measures.is_empty() {
            return Err(Error::InvalidConfig("no measure fields loaded".to_string()));
        }

        let all: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        let origin = fields_summary(&self.raw_data, &all)?;

        // measures are never grouped
        let typed_dimensions: Vec<Field> = origin
            .iter()
            .filter(|s| dimensions.contains(&s.field_name))
            .map(|s| Field::new(s.field_name.clone(), s.field_type))
            .collect();

        let grouper = FieldGrouper::new(GroupingConfig {
            max_group_number: self.config.max_group_number,
            ..Default::default()
        });
        let grouped = grouper.group_fields(&self.raw_data, &typed_dimensions)?;

        // grouped fields replace their source in place
        let cooked_dimensions: Vec<Field> = typed_dimensions
            .iter()
            .map(|field| {
                let derived = insightx_core::grouped_name(&field.name);
                grouped
                    .new_fields
                    .iter()
                    .find(|f| f.name == derived)
                    .cloned()
                    .unwrap_or_else(|| field.clone())
            })
            .collect();
        let cooked_measures: Vec<Field> = measures.iter().map(Field::quantitative).collect();

        let new_names: Vec<&str> = grouped.new_fields.iter().map(|f| f.name.as_str()).collect();
        let grouped_summary = fields_summary(&grouped.grouped_data, &new_names)?;
        debug!(grouped = new_names.len(), "univariate summary done");

        Ok(ExploreState {
            cooked_data: Arc::new(grouped.grouped_data),
            cooked_dimensions,
            cooked_measures,
            summary: Summary {
                origin,
                grouped: grouped_summary,
            },
            subspace_list: Vec::new(),
            view_spaces: Vec::new(),
            ..self.clone()
        })
    }

    fn subspace_search(&self, operator: Operator) -> Result<ExploreState> {
        if !self.is_summarized() {
            return Err(Error::InvalidConfig(
                "univariateSummary must run before subspaceSearch".to_string(),
            ));
        }

        // unknown entropy sorts last
        let mut ordered = self.cooked_dimensions.clone();
        ordered.sort_by(|a, b| {
            let ea = self.summary.entropy_of(&a.name).unwrap_or(f64::INFINITY);
            let eb = self.summary.entropy_of(&b.name).unwrap_or(f64::INFINITY);
            ea.total_cmp(&eb)
        });

        let keep = (ordered.len() as f64 * self.config.dimension_size).round() as usize;
        let selected = &ordered[..keep.min(ordered.len())];
        info!(
            dimensions = ordered.len(),
            selected = selected.len(),
            "searching subspaces"
        );

        let subspace_list = if selected.is_empty() {
            Vec::new()
        } else {
            let ranker = SubspaceRanker::new(self.config.subspace_percent_size)?;
            let analyzer = SubspaceAnalyzer::new(AnalysisConfig {
                operator,
                ..Default::default()
            });
            let records = analyzer.analyze(&self.cooked_data, selected, &self.cooked_measures)?;
            ranker.rank(records, &self.measure_names(), operator)
        };

        Ok(ExploreState {
            cooked_dimensions: ordered,
            subspace_list,
            view_spaces: Vec::new(),
            ..self.clone()
        })
    }

    fn build_views(&self) -> Result<ExploreState> {
        let mut seen = BTreeSet::new();
        let mut view_spaces: Vec<View> = Vec::new();

        for subspace in &self.subspace_list {
            if !seen.insert(subspace.dimensions.clone()) {
                continue;
            }
            let dims: Vec<Field> = subspace
                .dimensions
                .iter()
                .map(|name| self.dimension_field(name))
                .collect();
            let mut view = fields_view(&self.cooked_data, &dims, &self.cooked_measures)?;
            view.score = Some(subspace.score);
            view_spaces.push(view);
        }

        info!(views = view_spaces.len(), "insights extracted");
        Ok(ExploreState {
            view_spaces,
            ..self.clone()
        })
    }

    fn dimension_field(&self, name: &str) -> Field {
        self.cooked_dimensions
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .unwrap_or_else(|| Field::new(name, FieldType::Nominal))
    }

    fn role_names(&self, role: FieldRole) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.role == role)
            .map(|f| f.name.clone())
            .collect()
    }
}
