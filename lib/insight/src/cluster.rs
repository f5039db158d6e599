//! Measure clustering
//!
//! Groups measures that move together so they can share a view. Two
//! measures are linked when the absolute Pearson correlation of their raw
//! columns reaches the threshold; clusters are the connected components of
//! that graph.

use insightx_core::stats::correlation_matrix;
use insightx_core::{Error, Result, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for [`MeasureClusterer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfig {
    /// Minimum |r| linking two measures
    pub threshold: f64,
    pub max_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            max_cluster_size: 4,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        if self.max_cluster_size == 0 {
            return Err(Error::InvalidConfig("maxClusterSize must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasureClusterer {
    config: ClusterConfig,
}

impl MeasureClusterer {
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Partition `measures` into correlated clusters
    ///
    /// A component larger than `max_cluster_size` is split into consecutive
    /// chunks in measure order. Clusters are ordered by their first member.
    pub fn cluster<S: AsRef<str>>(&self, table: &Table, measures: &[S]) -> Result<Vec<Vec<String>>> {
        table.require_fields(measures)?;
        let columns: Vec<Vec<Option<f64>>> = measures
            .iter()
            .map(|m| table.numeric_column(m.as_ref()))
            .collect::<Result<_>>()?;
        let matrix = correlation_matrix(&columns);

        let n = measures.len();
        let mut component = vec![usize::MAX; n];
        let mut clusters: Vec<Vec<String>> = Vec::new();

        for start in 0..n {
            if component[start] != usize::MAX {
                continue;
            }
            let id = clusters.len();
            component[start] = id;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(i) = stack.pop() {
                members.push(i);
                for j in 0..n {
                    if component[j] == usize::MAX && matrix[i][j].abs() >= self.config.threshold {
                        component[j] = id;
                        stack.push(j);
                    }
                }
            }
            members.sort_unstable();

            for chunk in members.chunks(self.config.max_cluster_size) {
                clusters.push(chunk.iter().map(|&i| measures[i].as_ref().to_string()).collect());
            }
        }

        debug!(measures = n, clusters = clusters.len(), "clustered measures");
        Ok(clusters)
    }
}
