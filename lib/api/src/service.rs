//! Operation dispatch
//!
//! [`Service`] maps each [`Request`] onto the engine and wraps the outcome
//! in a [`Response`]. It holds no state between calls.

use crate::request::{FieldRef, Request, Response, ResponseData};
use insightx_core::{
    fields_summary, infer_field_type, Field, FieldGrouper, GroupingConfig, Result, Table,
};
use insightx_insight::{
    fields_view, insight_views, AnalysisConfig, InsightConfig, MeasureClusterer, SubspaceAnalyzer,
    SubspaceRanker,
};
use tracing::{info, warn};

/// Dimension fields typed by inference over the data
pub fn infer_dimensions<S: AsRef<str>>(table: &Table, names: &[S]) -> Vec<Field> {
    names
        .iter()
        .map(|name| Field::new(name.as_ref(), infer_field_type(table, name.as_ref())))
        .collect()
}

/// Measure fields are always quantitative
pub fn measure_fields<S: AsRef<str>>(names: &[S]) -> Vec<Field> {
    names.iter().map(|name| Field::quantitative(name.as_ref())).collect()
}

#[derive(Debug, Clone, Default)]
pub struct Service {
    grouping: GroupingConfig,
}

impl Service {
    pub fn new(grouping: GroupingConfig) -> Self {
        Self { grouping }
    }

    /// Run one request
    pub fn handle(&self, request: Request) -> Result<ResponseData> {
        let operation = request.operation();
        info!(operation, "handling request");

        match request {
            Request::GroupFields {
                data_source,
                fields,
                max_group_number,
            } => {
                let mut config = self.grouping.clone();
                if let Some(max) = max_group_number {
                    config.max_group_number = max;
                }
                let grouped = FieldGrouper::new(config).group_fields(&data_source, &fields)?;
                Ok(ResponseData::Grouped(grouped))
            }

            Request::FieldsSummary { data_source, fields } => {
                let names: Vec<&str> = fields.iter().map(FieldRef::name).collect();
                Ok(ResponseData::Summary(fields_summary(&data_source, &names)?))
            }

            Request::CombineFields {
                data_source,
                dimensions,
                measures,
                operator,
                top_k_percent,
            } => {
                let ranker = SubspaceRanker::new(top_k_percent)?;
                let analyzer = SubspaceAnalyzer::new(AnalysisConfig {
                    operator,
                    ..Default::default()
                });
                let records = analyzer.analyze(
                    &data_source,
                    &infer_dimensions(&data_source, &dimensions),
                    &measure_fields(&measures),
                )?;
                Ok(ResponseData::Subspaces(ranker.rank(records, &measures, operator)))
            }

            Request::FieldsAnalysis {
                data_source,
                dimensions,
                measures,
            } => {
                let view = fields_view(
                    &data_source,
                    &infer_dimensions(&data_source, &dimensions),
                    &measure_fields(&measures),
                )?;
                Ok(ResponseData::View(Box::new(view)))
            }

            Request::InsightViews {
                data_source,
                dimensions,
                measures,
                operator,
                top_k_percent,
                max_combination_size,
                max_combinations,
            } => {
                let config = InsightConfig {
                    operator,
                    max_combination_size,
                    max_combinations,
                    top_k_percent,
                };
                let views = insight_views(
                    &data_source,
                    &infer_dimensions(&data_source, &dimensions),
                    &measure_fields(&measures),
                    &config,
                )?;
                Ok(ResponseData::Views(views))
            }

            Request::ClusterMeasures {
                data_source,
                measures,
                config,
            } => {
                let clusters = MeasureClusterer::new(config)?.cluster(&data_source, &measures)?;
                Ok(ResponseData::Clusters(clusters))
            }
        }
    }

    /// Run a request and wrap the outcome in the response envelope
    pub fn respond(&self, request: Request) -> Response {
        let operation = request.operation();
        match self.handle(request) {
            Ok(data) => Response::ok(data),
            Err(e) => {
                warn!(operation, error = %e, "request failed");
                Response::error(e.to_string())
            }
        }
    }

    /// Parse a JSON request, run it and render the JSON response
    pub fn handle_json(&self, body: &str) -> Result<String> {
        let response = match serde_json::from_str::<Request>(body) {
            Ok(request) => self.respond(request),
            Err(e) => {
                warn!(error = %e, "malformed request");
                Response::error(format!("Serialization error: {}", e))
            }
        };
        Ok(serde_json::to_string(&response)?)
    }
}
