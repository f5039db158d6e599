//! View assembly
//!
//! Glues field ranking and specification building into ready-to-render
//! views, either for a single field set or for every top-ranked subspace.

use crate::analysis::{AnalysisConfig, CombinationSearch, SubspaceAnalyzer, SubspaceScope, DEFAULT_MAX_COMBINATIONS};
use crate::fields::{analyze_fields, FieldImpurity};
use crate::rank::{SubspaceRanker, DEFAULT_TOP_K_PERCENT};
use crate::spec::{SpecificationBuilder, ViewSpecification};
use insightx_core::{Error, Field, Operator, Result, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default largest dimension subset searched for insight views
pub const DEFAULT_MAX_COMBINATION_SIZE: usize = 2;

/// A chart with the fields it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub dimensions: Vec<String>,
    pub measures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub specification: ViewSpecification,
    pub field_scores: Vec<FieldImpurity>,
}

/// Build the view of one dimension/measure set
pub fn fields_view(table: &Table, dimensions: &[Field], measures: &[Field]) -> Result<View> {
    let analysis = analyze_fields(table, dimensions, measures)?;
    let specification = SpecificationBuilder::new().build(&analysis.field_scores, analysis.aggregated_data);

    Ok(View {
        dimensions: dimensions.iter().map(|f| f.name.clone()).collect(),
        measures: measures.iter().map(|f| f.name.clone()).collect(),
        score: None,
        specification,
        field_scores: analysis.field_scores,
    })
}

/// Configuration for [`insight_views`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightConfig {
    pub operator: Operator,
    pub max_combination_size: usize,
    pub max_combinations: usize,
    pub top_k_percent: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            operator: Operator::Sum,
            max_combination_size: DEFAULT_MAX_COMBINATION_SIZE,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            top_k_percent: DEFAULT_TOP_K_PERCENT,
        }
    }
}

/// One view per top-ranked dimension combination
///
/// Views come out in ranking order, lowest score first.
pub fn insight_views(
    table: &Table,
    dimensions: &[Field],
    measures: &[Field],
    config: &InsightConfig,
) -> Result<Vec<View>> {
    let ranker = SubspaceRanker::new(config.top_k_percent)?;
    if config.max_combination_size == 0 {
        return Err(Error::InvalidConfig("maxCombinationSize must be positive".to_string()));
    }

    let analyzer = SubspaceAnalyzer::new(AnalysisConfig {
        operator: config.operator,
        search: CombinationSearch::Subsets {
            max_size: config.max_combination_size,
        },
        scope: SubspaceScope::Combination,
        max_combinations: config.max_combinations,
    });
    let records = analyzer.analyze(table, dimensions, measures)?;
    let measure_names: Vec<String> = measures.iter().map(|f| f.name.clone()).collect();
    let subspaces = ranker.rank(records, &measure_names, config.operator);

    let mut views = Vec::with_capacity(subspaces.len());
    for subspace in subspaces {
        let dims: Vec<Field> = subspace
            .dimensions
            .iter()
            .map(|name| {
                subspace
                    .field_meta
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::FieldNotFound(name.clone()))
            })
            .collect::<Result<_>>()?;

        let mut view = fields_view(table, &dims, measures)?;
        view.score = Some(subspace.score);
        debug!(dimensions = ?view.dimensions, score = subspace.score, "built insight view");
        views.push(view);
    }

    info!(views = views.len(), "insight views ready");
    Ok(views)
}
